pub mod contact;
pub mod generate;
