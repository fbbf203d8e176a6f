//! Helpers shared by the unit tests.

#[cfg(test)]
pub(crate) mod testing;
