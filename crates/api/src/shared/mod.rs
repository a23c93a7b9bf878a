pub mod auth;
#[cfg(test)]
pub mod test_factory;
pub mod usecase;
