//! SeaORM entities for database tables

use sea_orm::entity::prelude::*;

/// Ticket lifecycle state, stored as a short string.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum TicketStatus {
    #[sea_orm(string_value = "waiting")]
    Waiting,
    #[sea_orm(string_value = "called")]
    Called,
    #[sea_orm(string_value = "done")]
    Done,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
    #[sea_orm(string_value = "transferred")]
    Transferred,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum CounterStatus {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "paused")]
    Paused,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum SeatKind {
    #[sea_orm(string_value = "officer")]
    Officer,
    #[sea_orm(string_value = "client")]
    Client,
}

/// Tenants table
pub mod tenant {
    use super::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "tenants")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,

        #[sea_orm(unique)]
        pub slug: String,

        pub name: String,

        /// IANA timezone name
        pub timezone: String,

        /// Issuance windows as a JSON array of {start, end} pairs
        pub allowed_time_ranges: Option<Json>,

        pub created_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(has_many = "super::counter::Entity")]
        Counters,
    }

    impl Related<super::counter::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Counters.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

/// Counters table
pub mod counter {
    use super::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "counters")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i64,

        pub tenant_id: Uuid,

        pub name: String,

        pub status: CounterStatus,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::tenant::Entity",
            from = "Column::TenantId",
            to = "super::tenant::Column::Id"
        )]
        Tenant,
        #[sea_orm(has_many = "super::seat::Entity")]
        Seats,
        #[sea_orm(has_many = "super::ticket::Entity")]
        Tickets,
    }

    impl Related<super::tenant::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Tenant.def()
        }
    }

    impl Related<super::seat::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Seats.def()
        }
    }

    impl Related<super::ticket::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Tickets.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

/// Counter pause audit log
pub mod counter_pause_log {
    use super::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "counter_pause_logs")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i64,

        pub tenant_id: Uuid,

        pub counter_id: i64,

        pub reason: String,

        pub created_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::counter::Entity",
            from = "Column::CounterId",
            to = "super::counter::Column::Id"
        )]
        Counter,
    }

    impl Related<super::counter::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Counter.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

/// Seats table
pub mod seat {
    use super::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "seats")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i64,

        pub tenant_id: Uuid,

        pub counter_id: i64,

        pub name: String,

        pub kind: SeatKind,

        pub occupied: bool,

        /// Last occupied-to-empty flip
        pub last_empty_time: Option<DateTimeUtc>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::counter::Entity",
            from = "Column::CounterId",
            to = "super::counter::Column::Id"
        )]
        Counter,
        #[sea_orm(has_many = "super::seat_log::Entity")]
        Logs,
    }

    impl Related<super::counter::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Counter.def()
        }
    }

    impl Related<super::seat_log::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Logs.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

/// Seat occupancy audit log
pub mod seat_log {
    use super::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "seat_logs")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i64,

        pub tenant_id: Uuid,

        pub seat_id: i64,

        pub old_status: bool,

        pub new_status: bool,

        pub timestamp: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::seat::Entity",
            from = "Column::SeatId",
            to = "super::seat::Column::Id"
        )]
        Seat,
    }

    impl Related<super::seat::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Seat.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

/// Tickets table
pub mod ticket {
    use super::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "tickets")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i64,

        pub tenant_id: Uuid,

        pub counter_id: i64,

        /// Display number, restarts each tenant-local day
        pub number: i32,

        pub status: TicketStatus,

        pub created_at: DateTimeUtc,

        pub called_at: Option<DateTimeUtc>,

        pub finished_at: Option<DateTimeUtc>,

        pub rating: Option<i16>,

        pub feedback: Option<String>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::counter::Entity",
            from = "Column::CounterId",
            to = "super::counter::Column::Id"
        )]
        Counter,
    }

    impl Related<super::counter::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Counter.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}
