// Domain layer - Customer records, dates and tax status
pub mod customer;
pub mod dashboard;
pub mod date;
pub mod status;
