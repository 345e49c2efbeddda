pub mod json;
pub mod terminal;
pub mod text;
pub mod theme;
pub mod widgets;
