// Response rendering layer
// - interpret.rs: maps (operation, diagram format, response) to an outcome
// - html.rs: HTML documents for the diagram panels
pub mod html;
pub mod interpret;
