usecase! {
    list : {} => {
        pub posts: Vec<entities::BlogPost>,
        pub usernames: crate::usecases::Usernames,
    }
}

usecase! {
    get : {
        pub post_id: entities::PostId,
    } => {
        pub post: entities::BlogPost,
        pub usernames: crate::usecases::Usernames,
    }
}

usecase! {
    create : {
        pub title: Option<String>,
        pub content: Option<String>,
        pub excerpt: Option<String>,
        pub image_url: Option<String>,
        pub tags: Option<Vec<String>>,
        pub music_track: Option<entities::TrackRef>,
        pub author: entities::UserId,
    } => {
        pub post: entities::BlogPost,
        pub usernames: crate::usecases::Usernames,
    }
}

usecase! {
    delete : {
        pub post_id: entities::PostId,
        pub requester: entities::UserId,
        pub role: entities::Role,
    } => {
        pub post: entities::BlogPost,
    }
}

usecase! {
    like : {
        pub post_id: entities::PostId,
        pub user_id: entities::UserId,
    } => {
        pub post: entities::BlogPost,
        pub usernames: crate::usecases::Usernames,
        pub liked: bool,
    }
}

usecase! {
    comment : {
        pub post_id: entities::PostId,
        pub user_id: entities::UserId,
        pub text: Option<String>,
    } => {
        pub post: entities::BlogPost,
        pub usernames: crate::usecases::Usernames,
    }
}
