usecase! {
    register : {
        pub username: Option<String>,
        pub email: Option<String>,
        pub password: Option<entities::Password>,
    } => {
        pub user: entities::User,
        pub token: String,
    }
}

usecase! {
    login : {
        pub email: Option<String>,
        pub password: Option<entities::Password>,
    } => {
        pub user: entities::User,
        pub token: String,
    }
}

usecase! {
    me : {
        pub user_id: entities::UserId,
    } => {
        pub user: entities::User,
    }
}
