//! User and AMC renewal approval transitions.
//!
//! Stateless rules over plain inputs; the repositories apply the resulting
//! transitions atomically.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// User role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserRole {
    /// Full access, including approvals.
    Admin,
    /// A gaushala operator.
    User,
}

impl UserRole {
    /// Parse a role from its stored string form.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Admin" => Some(Self::Admin),
            "User" => Some(Self::User),
            _ => None,
        }
    }

    /// Returns the stored string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::User => "User",
        }
    }
}

/// Account lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserStatus {
    /// Signed up, waiting for admin approval.
    Pending,
    /// Approved and within the AMC validity window.
    Active,
    /// Disabled by an admin.
    Inactive,
    /// AMC validity has lapsed.
    Expired,
}

impl UserStatus {
    /// Parse a status from its stored string form.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Pending" => Some(Self::Pending),
            "Active" => Some(Self::Active),
            "Inactive" => Some(Self::Inactive),
            "Expired" => Some(Self::Expired),
            _ => None,
        }
    }

    /// Returns the stored string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Active => "Active",
            Self::Inactive => "Inactive",
            Self::Expired => "Expired",
        }
    }
}

/// AMC renewal status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenewalStatus {
    /// Submitted, awaiting admin approval.
    Pending,
    /// Approved; the user's validity was extended.
    Approved,
}

impl RenewalStatus {
    /// Parse a renewal status from its stored string form.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Pending" => Some(Self::Pending),
            "Approved" => Some(Self::Approved),
            _ => None,
        }
    }

    /// Returns the stored string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
        }
    }
}

/// Errors from approval transitions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApprovalError {
    /// The user is not awaiting approval.
    #[error("user is {status}, only Pending users can be approved")]
    UserNotPending {
        /// The user's actual status.
        status: &'static str,
    },

    /// The renewal was already approved.
    #[error("renewal is already approved")]
    RenewalNotPending,

    /// The customer ID is required at approval.
    #[error("customer id must not be empty")]
    EmptyCustomerId,
}

/// The transition applied to a user on approval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserApproval {
    /// New status, always `Active`.
    pub status: UserStatus,
    /// Customer ID assigned by the admin.
    pub customer_id: String,
    /// AMC validity end date.
    pub validity_date: NaiveDate,
}

/// Approves a pending user, assigning a customer ID and validity date.
pub fn approve_user(
    current: UserStatus,
    customer_id: &str,
    validity_date: NaiveDate,
) -> Result<UserApproval, ApprovalError> {
    if current != UserStatus::Pending {
        return Err(ApprovalError::UserNotPending {
            status: current.as_str(),
        });
    }
    if customer_id.trim().is_empty() {
        return Err(ApprovalError::EmptyCustomerId);
    }
    Ok(UserApproval {
        status: UserStatus::Active,
        customer_id: customer_id.to_string(),
        validity_date,
    })
}

/// The transition applied when an admin approves an AMC renewal. The renewal
/// flips to `Approved` and the user is re-activated with a new validity date,
/// both in one database transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenewalApproval {
    /// New renewal status, always `Approved`.
    pub renewal_status: RenewalStatus,
    /// New user status, always `Active`.
    pub user_status: UserStatus,
    /// New AMC validity end date for the user.
    pub validity_date: NaiveDate,
}

/// Approves a pending AMC renewal.
pub fn approve_renewal(
    current: RenewalStatus,
    new_validity_date: NaiveDate,
) -> Result<RenewalApproval, ApprovalError> {
    if current != RenewalStatus::Pending {
        return Err(ApprovalError::RenewalNotPending);
    }
    Ok(RenewalApproval {
        renewal_status: RenewalStatus::Approved,
        user_status: UserStatus::Active,
        validity_date: new_validity_date,
    })
}

/// The outcome of checking a user's status at login.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginGate {
    /// Credentials may be accepted.
    Allowed,
    /// The account requires admin approval.
    PendingApproval,
    /// The account is inactive or expired.
    Blocked,
    /// The validity date has lapsed; persist `Expired` and reject.
    JustExpired,
}

/// Gates a login by account status and AMC validity.
///
/// An `Active` user whose validity date is strictly before `today` expires at
/// this check; the caller persists the flip before rejecting.
#[must_use]
pub fn gate_login(status: UserStatus, validity_date: Option<NaiveDate>, today: NaiveDate) -> LoginGate {
    match status {
        UserStatus::Pending => LoginGate::PendingApproval,
        UserStatus::Inactive | UserStatus::Expired => LoginGate::Blocked,
        UserStatus::Active => match validity_date {
            Some(validity) if validity < today => LoginGate::JustExpired,
            _ => LoginGate::Allowed,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_approve_pending_user() {
        let approval = approve_user(UserStatus::Pending, "CUST-042", d("2025-03-31")).unwrap();
        assert_eq!(approval.status, UserStatus::Active);
        assert_eq!(approval.customer_id, "CUST-042");
        assert_eq!(approval.validity_date, d("2025-03-31"));
    }

    #[test]
    fn test_approve_non_pending_user_fails() {
        for status in [UserStatus::Active, UserStatus::Inactive, UserStatus::Expired] {
            let err = approve_user(status, "CUST-042", d("2025-03-31")).unwrap_err();
            assert_eq!(
                err,
                ApprovalError::UserNotPending {
                    status: status.as_str()
                }
            );
        }
    }

    #[test]
    fn test_approve_user_requires_customer_id() {
        let err = approve_user(UserStatus::Pending, "  ", d("2025-03-31")).unwrap_err();
        assert_eq!(err, ApprovalError::EmptyCustomerId);
    }

    #[test]
    fn test_approve_renewal() {
        let approval = approve_renewal(RenewalStatus::Pending, d("2026-03-31")).unwrap();
        assert_eq!(approval.renewal_status, RenewalStatus::Approved);
        assert_eq!(approval.user_status, UserStatus::Active);
        assert_eq!(approval.validity_date, d("2026-03-31"));

        assert_eq!(
            approve_renewal(RenewalStatus::Approved, d("2026-03-31")),
            Err(ApprovalError::RenewalNotPending)
        );
    }

    #[test]
    fn test_gate_login_by_status() {
        let today = d("2024-06-01");
        assert_eq!(
            gate_login(UserStatus::Pending, None, today),
            LoginGate::PendingApproval
        );
        assert_eq!(
            gate_login(UserStatus::Inactive, None, today),
            LoginGate::Blocked
        );
        assert_eq!(
            gate_login(UserStatus::Expired, Some(d("2025-01-01")), today),
            LoginGate::Blocked
        );
        assert_eq!(gate_login(UserStatus::Active, None, today), LoginGate::Allowed);
    }

    #[test]
    fn test_gate_login_validity_boundary() {
        let today = d("2024-06-01");
        // Valid through today itself.
        assert_eq!(
            gate_login(UserStatus::Active, Some(d("2024-06-01")), today),
            LoginGate::Allowed
        );
        assert_eq!(
            gate_login(UserStatus::Active, Some(d("2024-05-31")), today),
            LoginGate::JustExpired
        );
    }

    #[test]
    fn test_status_round_trips() {
        for s in [
            UserStatus::Pending,
            UserStatus::Active,
            UserStatus::Inactive,
            UserStatus::Expired,
        ] {
            assert_eq!(UserStatus::parse(s.as_str()), Some(s));
        }
        for r in [RenewalStatus::Pending, RenewalStatus::Approved] {
            assert_eq!(RenewalStatus::parse(r.as_str()), Some(r));
        }
        for r in [UserRole::Admin, UserRole::User] {
            assert_eq!(UserRole::parse(r.as_str()), Some(r));
        }
    }
}
