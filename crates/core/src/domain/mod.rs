pub mod answer;
pub mod intent;
pub mod query;
pub mod question;
pub mod record;
