pub mod analyses;
pub mod documents;
pub mod feedback;
pub mod sessions;
pub mod violations;
