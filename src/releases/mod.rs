//! Release management: the list view model, the create/edit form, and the
//! page that ties both to the API and the error banner.

pub mod form;
pub mod page;
pub mod view;

pub use form::{Field, FieldChange, FormMode, ReleaseForm, Submission};
pub use page::ReleasePage;
pub use view::{
    Column, ColumnFilters, PAGE_SIZES, ReleaseListView, SortDirection, SortState, StatusFilter,
    filter_by_date_range,
};
