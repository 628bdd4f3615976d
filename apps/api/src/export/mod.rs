// Write-back of the resume and cover letter to the local save service.

pub mod client;
pub mod handlers;
