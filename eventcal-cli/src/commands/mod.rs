pub mod add;
pub mod conflicts;
pub mod delete;
pub mod edit;
pub mod expand;
pub mod form;
pub mod list;
pub mod reschedule;
pub mod search;
