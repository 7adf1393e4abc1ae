pub mod auth;
pub mod email;
pub mod iyzico;
pub mod volunteer_form;
