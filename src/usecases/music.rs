usecase! {
    list : {
        pub language: Option<String>,
        pub search: Option<String>,
        pub sort: Option<String>,
    } => {
        pub tracks: Vec<entities::MusicTrack>,
        pub usernames: crate::usecases::Usernames,
    }
}

usecase! {
    trending : {} => {
        pub tracks: Vec<entities::MusicTrack>,
        pub usernames: crate::usecases::Usernames,
    }
}

usecase! {
    add : {
        pub title: Option<String>,
        pub artist: Option<String>,
        pub language: Option<String>,
        pub image_url: Option<String>,
        pub audio_url: Option<String>,
        pub added_by: entities::UserId,
    } => {
        pub track: entities::MusicTrack,
        pub usernames: crate::usecases::Usernames,
    }
}

usecase! {
    like : {
        pub music_id: entities::MusicId,
        pub user_id: entities::UserId,
    } => {
        pub track: entities::MusicTrack,
        pub liked: bool,
    }
}

usecase! {
    play : {
        pub music_id: entities::MusicId,
    } => {
        pub plays: u64,
    }
}
