pub(crate) mod account_service;
