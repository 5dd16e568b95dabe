//! Wire and domain types shared by the catalog, reservation and account flows

mod account;
mod book;
mod reservation;

pub use account::{
    Credentials, Library, LoginResponse, LoginUser, MemberProfile, PasswordChange,
    RegistrationForm, Role, UserAccount,
};
pub use book::{BookListing, BookStatus, SearchFilters};
pub use reservation::{Reservation, ReservationQuota, ReservationStatus};
