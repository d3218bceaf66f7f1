pub mod currencies;
pub mod price;
pub mod ui;
