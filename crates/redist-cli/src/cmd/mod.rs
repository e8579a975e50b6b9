pub mod affixes;
pub mod directory;
pub mod list_platforms;
pub mod resolve;
