use std::sync::Arc;

use crate::auth::{PasswordService, TokenService};
use crate::controllers::{AppState, BlogController, MusicController, UserController};
use crate::entities::{BlogPost, MusicTrack, User};
use crate::interactors::blog::{
    PostCommentInteractor, PostCreateInteractor, PostDeleteInteractor, PostGetInteractor,
    PostLikeInteractor, PostListInteractor,
};
use crate::interactors::music::{
    MusicAddInteractor, MusicLikeInteractor, MusicListInteractor, MusicPlayInteractor,
    MusicTrendingInteractor,
};
use crate::interactors::user::{UserLoginInteractor, UserMeInteractor, UserRegisterInteractor};
use crate::repositories::memory::InMemoryRepository;
use crate::repositories::mongo::{MongoMusicRepository, MongoPostRepository, MongoUserRepository};
use crate::repositories::{MusicRepository, PostRepository, UserRepository};

/// Wires every interactor to one set of stores.
fn assemble(
    user_repository: Arc<dyn UserRepository + Sync + Send>,
    music_repository: Arc<dyn MusicRepository + Sync + Send>,
    post_repository: Arc<dyn PostRepository + Sync + Send>,
    tokens: TokenService,
    passwords: PasswordService,
) -> AppState {
    let user = UserController {
        register: Arc::new(UserRegisterInteractor {
            user_repository: user_repository.clone(),
            passwords: passwords.clone(),
            tokens: tokens.clone(),
        }),
        login: Arc::new(UserLoginInteractor {
            user_repository: user_repository.clone(),
            passwords,
            tokens: tokens.clone(),
        }),
        me: Arc::new(UserMeInteractor {
            user_repository: user_repository.clone(),
        }),
    };

    let music = MusicController {
        list: Arc::new(MusicListInteractor {
            music_repository: music_repository.clone(),
            user_repository: user_repository.clone(),
        }),
        trending: Arc::new(MusicTrendingInteractor {
            music_repository: music_repository.clone(),
            user_repository: user_repository.clone(),
        }),
        add: Arc::new(MusicAddInteractor {
            music_repository: music_repository.clone(),
            user_repository: user_repository.clone(),
        }),
        like: Arc::new(MusicLikeInteractor {
            music_repository: music_repository.clone(),
        }),
        play: Arc::new(MusicPlayInteractor { music_repository }),
    };

    let blog = BlogController {
        list: Arc::new(PostListInteractor {
            post_repository: post_repository.clone(),
            user_repository: user_repository.clone(),
        }),
        get: Arc::new(PostGetInteractor {
            post_repository: post_repository.clone(),
            user_repository: user_repository.clone(),
        }),
        create: Arc::new(PostCreateInteractor {
            post_repository: post_repository.clone(),
            user_repository: user_repository.clone(),
        }),
        delete: Arc::new(PostDeleteInteractor {
            post_repository: post_repository.clone(),
        }),
        like: Arc::new(PostLikeInteractor {
            post_repository: post_repository.clone(),
            user_repository: user_repository.clone(),
        }),
        comment: Arc::new(PostCommentInteractor {
            post_repository,
            user_repository,
        }),
    };

    AppState {
        user: Arc::new(user),
        music: Arc::new(music),
        blog: Arc::new(blog),
        tokens: Arc::new(tokens),
        expose_internal_errors: false,
    }
}

pub fn in_memory(tokens: TokenService, passwords: PasswordService) -> AppState {
    assemble(
        Arc::new(InMemoryRepository::<User>::new()),
        Arc::new(InMemoryRepository::<MusicTrack>::new()),
        Arc::new(InMemoryRepository::<BlogPost>::new()),
        tokens,
        passwords,
    )
}

pub async fn mongo(
    uri_str: impl AsRef<str>,
    db_name: impl AsRef<str>,
    tokens: TokenService,
    passwords: PasswordService,
) -> ::anyhow::Result<AppState> {
    let c = ::mongodb::Client::with_uri_str(uri_str).await?;
    let db = c.database(db_name.as_ref());

    let state = assemble(
        Arc::new(MongoUserRepository::new_with(db.clone()).await?),
        Arc::new(MongoMusicRepository::new_with(db.clone()).await?),
        Arc::new(MongoPostRepository::new_with(db).await?),
        tokens,
        passwords,
    );

    Ok(state)
}
