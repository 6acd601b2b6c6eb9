pub(crate) mod deck;
pub(crate) mod model;
