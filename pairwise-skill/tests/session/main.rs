mod helpers;
mod resume;
mod voting;
