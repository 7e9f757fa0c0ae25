mod routines;
mod social;
mod workout;

pub use routines::RoutinesPage;
pub use social::SocialPage;
pub use workout::WorkoutPage;
