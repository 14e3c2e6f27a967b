/// JSON to PHP serialize encoding command.
pub mod encode;
