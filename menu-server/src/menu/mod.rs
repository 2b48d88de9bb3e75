//! 菜单模块
//!
//! - [`book`] - 菜品/分类存储 (JSON 文件持久化)
//! - [`layout`] - 打印菜单排版 (商业版 / 家庭版)
//! - [`defaults`] - 内置默认菜单

pub mod book;
pub mod defaults;
pub mod layout;

pub use book::{MenuBook, MenuData, MenuError};
pub use layout::{MenuPage, MenuSection, MenuView, ViewMode, build_pages, build_view};
