//! Shared UI icons.
//!
//! Each icon has a plain-text fallback for terminals without emoji support.

use console::Emoji;

// Status indicators
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "[OK]");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "[ERR]");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "[!]");
pub static LOCK: Emoji<'_, '_> = Emoji("🔒 ", "[AUTH]");

// Dashboard
pub static CHART: Emoji<'_, '_> = Emoji("📊 ", "");
pub static TREND_UP: Emoji<'_, '_> = Emoji("📈 ", "^");
pub static TREND_DOWN: Emoji<'_, '_> = Emoji("📉 ", "v");

// Releases
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", "");
pub static LINK: Emoji<'_, '_> = Emoji("🔗 ", "->");
pub static TRASH: Emoji<'_, '_> = Emoji("🗑️  ", "-");
