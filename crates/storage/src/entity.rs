pub mod contests {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "contests")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub name: String,
        pub description: String,
        pub image: String,
        pub price: f64,
        pub prize_money: f64,
        pub task_instruction: String,
        pub contest_type: String,
        pub deadline: DateTimeUtc,
        pub creator_email: String,
        pub status: ContestStatusDb,
        pub payment_state: PaymentStateDb,
        pub payment_count: i64,
        pub created_at: DateTimeUtc,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
    #[sea_orm(rs_type = "String", db_type = "String(Some(16))")]
    pub enum ContestStatusDb {
        #[sea_orm(string_value = "pending")]
        Pending,
        #[sea_orm(string_value = "confirmed")]
        Confirmed,
        #[sea_orm(string_value = "rejected")]
        Rejected,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
    #[sea_orm(rs_type = "String", db_type = "String(Some(16))")]
    pub enum PaymentStateDb {
        #[sea_orm(string_value = "unset")]
        Unset,
        #[sea_orm(string_value = "paid")]
        Paid,
    }

    #[derive(Debug, Clone, Copy, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod users {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "users")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub email: String,
        pub role: UserRoleDb,
        pub created_at: DateTimeUtc,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
    #[sea_orm(rs_type = "String", db_type = "String(Some(16))")]
    pub enum UserRoleDb {
        #[sea_orm(string_value = "user")]
        User,
        #[sea_orm(string_value = "admin")]
        Admin,
    }

    #[derive(Debug, Clone, Copy, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod payments {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "payments")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub transaction_id: String,
        pub contest_id: i32,
        pub amount: f64,
        pub currency: String,
        pub customer_email: String,
        pub payment_status: String,
        pub paid_at: DateTimeUtc,
    }

    #[derive(Debug, Clone, Copy, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod tasks {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "tasks")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub contest_id: i32,
        pub participant_email: String,
        pub submission_url: String,
        pub winner_status: WinnerStatusDb,
        pub submitted_at: DateTimeUtc,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
    #[sea_orm(rs_type = "String", db_type = "String(Some(16))")]
    pub enum WinnerStatusDb {
        #[sea_orm(string_value = "pending")]
        Pending,
        #[sea_orm(string_value = "winner")]
        Winner,
    }

    #[derive(Debug, Clone, Copy, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}
