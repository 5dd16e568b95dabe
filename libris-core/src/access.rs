//! Role-gated areas of the client

use crate::types::Role;

/// A protected part of the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Area {
    /// Book search. Any signed-in user.
    Catalog,
    /// A member's own reservations
    MyReservations,
    /// Pending registrations, for librarians
    ApproveUsers,
}

impl Area {
    /// Role needed beyond being signed in
    pub fn required_role(self) -> Option<Role> {
        match self {
            Self::Catalog => None,
            Self::MyReservations => Some(Role::Member),
            Self::ApproveUsers => Some(Role::Librarian),
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Catalog => "Books",
            Self::MyReservations => "My Reservations",
            Self::ApproveUsers => "Approve Users",
        }
    }
}

/// Where a user lands after signing in
pub fn landing_area(role: &Role) -> Area {
    match role {
        Role::Member => Area::MyReservations,
        Role::Librarian => Area::ApproveUsers,
        Role::Other(_) => Area::Catalog,
    }
}
