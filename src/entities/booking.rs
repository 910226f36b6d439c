use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Booking lifecycle status.
///
/// A booking starts out `pending` with no driver or admin attached. An admin
/// binds a driver (`assigned`), the driver either takes the trip (`confirmed`
/// then `on_the_way`) or turns it down (`declined`), and an in-progress trip
/// ends `completed` or `incomplete`. `cancelled` exists in the status
/// vocabulary for legacy rows but no operation produces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "booking_status")]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "assigned")]
    Assigned,
    #[sea_orm(string_value = "confirmed")]
    Confirmed,
    #[sea_orm(string_value = "declined")]
    Declined,
    #[sea_orm(string_value = "on_the_way")]
    OnTheWay,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "incomplete")]
    Incomplete,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl BookingStatus {
    /// The full transition table. Anything not listed here is rejected
    /// before any write is attempted.
    pub fn can_transition_to(self, to: BookingStatus) -> bool {
        use BookingStatus::*;
        matches!(
            (self, to),
            (Pending, Assigned)
                | (Assigned, Pending)
                | (Assigned, Confirmed)
                | (Assigned, Declined)
                | (Confirmed, OnTheWay)
                | (OnTheWay, Completed)
                | (OnTheWay, Incomplete)
        )
    }

    /// Terminal statuses admit no further transitions.
    pub fn is_terminal(self) -> bool {
        use BookingStatus::*;
        matches!(self, Completed | Incomplete | Declined | Cancelled)
    }

    pub fn as_str(self) -> &'static str {
        use BookingStatus::*;
        match self {
            Pending => "pending",
            Assigned => "assigned",
            Confirmed => "confirmed",
            Declined => "declined",
            OnTheWay => "on_the_way",
            Completed => "completed",
            Incomplete => "incomplete",
            Cancelled => "cancelled",
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "booking")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub customer_id: Uuid,
    pub driver_id: Option<Uuid>,
    pub admin_id: Option<Uuid>,
    pub pickup_location: String,
    pub dropoff_location: String,
    pub pickup_time: DateTimeWithTimeZone,
    pub status: BookingStatus,
    pub fare: f64,
    pub cancellation_reason: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::customer::Entity",
        from = "Column::CustomerId",
        to = "super::customer::Column::Id"
    )]
    Customer,
    #[sea_orm(
        belongs_to = "super::driver::Entity",
        from = "Column::DriverId",
        to = "super::driver::Column::Id"
    )]
    Driver,
    #[sea_orm(
        belongs_to = "super::admin::Entity",
        from = "Column::AdminId",
        to = "super::admin::Column::Id"
    )]
    Admin,
}

impl Related<super::customer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customer.def()
    }
}

impl Related<super::driver::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Driver.def()
    }
}

impl Related<super::admin::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Admin.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::BookingStatus::{self, *};
    use sea_orm::Iterable;

    const ALLOWED: &[(BookingStatus, BookingStatus)] = &[
        (Pending, Assigned),
        (Assigned, Pending),
        (Assigned, Confirmed),
        (Assigned, Declined),
        (Confirmed, OnTheWay),
        (OnTheWay, Completed),
        (OnTheWay, Incomplete),
    ];

    #[test]
    fn test_listed_transitions_permitted() {
        for (from, to) in ALLOWED {
            assert!(from.can_transition_to(*to), "{from:?} -> {to:?}");
        }
    }

    #[test]
    fn test_unlisted_transitions_rejected() {
        for from in BookingStatus::iter() {
            for to in BookingStatus::iter() {
                let listed = ALLOWED.contains(&(from, to));
                assert_eq!(
                    from.can_transition_to(to),
                    listed,
                    "{from:?} -> {to:?}"
                );
            }
        }
    }

    #[test]
    fn test_terminal_states_have_no_exits() {
        for from in BookingStatus::iter().filter(|s| s.is_terminal()) {
            for to in BookingStatus::iter() {
                assert!(!from.can_transition_to(to), "{from:?} -> {to:?}");
            }
        }
    }

    #[test]
    fn test_self_transitions_rejected() {
        for status in BookingStatus::iter() {
            assert!(!status.can_transition_to(status));
        }
    }

    #[test]
    fn test_cancelled_is_unreachable() {
        for from in BookingStatus::iter() {
            assert!(!from.can_transition_to(Cancelled));
        }
    }
}
