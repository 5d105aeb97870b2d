// Export of pipeline artifacts as downloadable files.
// DOCX encoding is CPU-bound and runs inside tokio::task::spawn_blocking.

pub mod docx;
pub mod handlers;
