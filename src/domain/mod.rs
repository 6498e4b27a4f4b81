pub mod category;
pub mod conversation;
pub mod ticket;
