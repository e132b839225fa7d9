mod banner;
mod donation;
mod review;

pub use banner::ThankYouBanner;
pub use donation::DonationModal;
pub use review::ReviewWidget;
