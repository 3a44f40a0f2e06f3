pub mod coordinate;
pub mod source;
pub mod venue;
