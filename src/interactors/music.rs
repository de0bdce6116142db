use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use super::*;
use crate::entities::{Language, MusicTrack};
use crate::error::{AppError, Result};
use crate::repositories::{MusicQuery, MusicRepository, MusicSort, UserRepository};
use crate::usecases::music::{add, like, list, play, trending};
use crate::utils::{non_blank, AlsoChain, LetChain};

const TRENDING_LIMIT: usize = 10;

/// `None` (and the "all" sentinel) mean no filter.
fn parse_language(raw: Option<String>) -> Result<Option<Language>> {
    match non_blank(raw) {
        None => Ok(None),
        Some(s) if s == "all" => Ok(None),
        Some(s) => s
            .parse::<Language>()
            .map(Some)
            .map_err(|_| AppError::Validation(format!("Unknown language: {}", s))),
    }
}

fn adders(tracks: &[MusicTrack]) -> HashSet<UserId> { tracks.iter().map(|m| m.added_by).collect() }

pub struct MusicListInteractor {
    pub music_repository: Arc<dyn MusicRepository + Sync + Send>,
    pub user_repository: Arc<dyn UserRepository + Sync + Send>,
}
#[async_trait]
impl list::Usecase for MusicListInteractor {
    #[tracing::instrument(skip(self))]
    async fn handle(&self, data: list::Input) -> Result<list::Output> {
        tracing::trace!("input - {:?}", data);

        let list::Input {
            language,
            search,
            sort,
        } = data;

        let sort = match non_blank(sort) {
            None => MusicSort::default(),
            Some(s) => s
                .parse::<MusicSort>()
                .map_err(|e| AppError::Validation(e.to_string()))?,
        };
        let query = MusicQuery {
            language: parse_language(language)?,
            text: non_blank(search),
            sort,
            limit: None,
        };

        let tracks = self
            .music_repository
            .finds(query)
            .await
            .map_err(music_err_fmt)?;
        let usernames = usernames(&*self.user_repository, adders(&tracks)).await?;

        list::Output { tracks, usernames }
            .also_(|o| tracing::trace!("output - {} tracks", o.tracks.len()))
            .let_(Ok)
    }
}

pub struct MusicTrendingInteractor {
    pub music_repository: Arc<dyn MusicRepository + Sync + Send>,
    pub user_repository: Arc<dyn UserRepository + Sync + Send>,
}
#[async_trait]
impl trending::Usecase for MusicTrendingInteractor {
    #[tracing::instrument(skip(self))]
    async fn handle(&self, data: trending::Input) -> Result<trending::Output> {
        tracing::trace!("input - {:?}", data);

        let tracks = self
            .music_repository
            .finds(MusicQuery {
                sort: MusicSort::Plays,
                limit: Some(TRENDING_LIMIT),
                ..Default::default()
            })
            .await
            .map_err(music_err_fmt)?;
        let usernames = usernames(&*self.user_repository, adders(&tracks)).await?;

        trending::Output { tracks, usernames }.let_(Ok)
    }
}

pub struct MusicAddInteractor {
    pub music_repository: Arc<dyn MusicRepository + Sync + Send>,
    pub user_repository: Arc<dyn UserRepository + Sync + Send>,
}
#[async_trait]
impl add::Usecase for MusicAddInteractor {
    #[tracing::instrument(skip(self))]
    async fn handle(&self, data: add::Input) -> Result<add::Output> {
        tracing::trace!("input - {:?}", data);

        let add::Input {
            title,
            artist,
            language,
            image_url,
            audio_url,
            added_by,
        } = data;

        let fields = [
            ("Title", non_blank(title)),
            ("Artist", non_blank(artist)),
            ("Language", non_blank(language)),
            ("Image URL", non_blank(image_url)),
            ("Audio URL", non_blank(audio_url)),
        ];
        let missing = fields
            .iter()
            .filter(|(_, v)| v.is_none())
            .map(|(name, _)| format!("{} is required", name))
            .collect::<Vec<_>>();
        if !missing.is_empty() {
            return Err(AppError::Validation(missing.join(", ")));
        }

        let [title, artist, language, image_url, audio_url] =
            fields.map(|(_, v)| v.unwrap_or_default());
        let language = language
            .parse::<Language>()
            .map_err(|_| AppError::Validation(format!("Unknown language: {}", language)))?;

        let now = Utc::now();
        let new_track = MusicTrack {
            id: ::uuid::Uuid::new_v4().into(),
            title,
            artist,
            language,
            image_url,
            audio_url,
            likes: HashSet::new(),
            plays: 0,
            added_by,
            created_at: now,
            updated_at: now,
        };

        let can_insert = self
            .music_repository
            .insert(new_track.clone())
            .await
            .map_err(music_err_fmt)?;

        if !can_insert {
            return Err(AppError::DuplicateKey("This song already exists".to_string()));
        }

        let usernames = usernames(&*self.user_repository, HashSet::from([added_by])).await?;

        add::Output {
            track: new_track,
            usernames,
        }
        .also_(|o| tracing::trace!("output - {:?}", o))
        .let_(Ok)
    }
}

pub struct MusicLikeInteractor {
    pub music_repository: Arc<dyn MusicRepository + Sync + Send>,
}
#[async_trait]
impl like::Usecase for MusicLikeInteractor {
    #[tracing::instrument(skip(self))]
    async fn handle(&self, data: like::Input) -> Result<like::Output> {
        tracing::trace!("input - {:?}", data);

        let like::Input { music_id, user_id } = data;

        let liked = toggle_like(&*self.music_repository, music_id, user_id)
            .await
            .map_err(music_err_fmt)?;
        let track = self
            .music_repository
            .find(music_id)
            .await
            .map_err(music_err_fmt)?;

        like::Output { track, liked }
            .also_(|o| tracing::trace!("output - liked: {}", o.liked))
            .let_(Ok)
    }
}

pub struct MusicPlayInteractor {
    pub music_repository: Arc<dyn MusicRepository + Sync + Send>,
}
#[async_trait]
impl play::Usecase for MusicPlayInteractor {
    #[tracing::instrument(skip(self))]
    async fn handle(&self, data: play::Input) -> Result<play::Output> {
        tracing::trace!("input - {:?}", data);

        self.music_repository
            .increment_plays(data.music_id)
            .await
            .map_err(music_err_fmt)?
            .let_(|plays| play::Output { plays })
            .let_(Ok)
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::super::fixtures::Fixture;
    use super::*;
    use crate::entities::{MusicId, Role, UserId};

    fn add_with(f: &Fixture) -> MusicAddInteractor {
        MusicAddInteractor {
            music_repository: f.musics.clone(),
            user_repository: f.users.clone(),
        }
    }

    fn input(title: &str, artist: &str, language: &str, by: UserId) -> add::Input {
        add::Input {
            title: Some(title.to_string()),
            artist: Some(artist.to_string()),
            language: Some(language.to_string()),
            image_url: Some("https://img.example.com/a.png".to_string()),
            audio_url: Some("https://audio.example.com/a.mp3".to_string()),
            added_by: by,
        }
    }

    async fn add_track(f: &Fixture, title: &str, language: &str, by: UserId) -> MusicId {
        add::Usecase::handle(&add_with(f), input(title, "Various", language, by))
            .await
            .unwrap()
            .track
            .id
    }

    #[tokio::test]
    async fn add_starts_empty_and_names_the_adder() {
        let f = Fixture::new();
        let by = f.user("ravi", Role::Member).await;

        let out = add::Usecase::handle(&add_with(&f), input(" Kesariya ", "Arijit", "Hindi", by))
            .await
            .unwrap();

        assert_eq!(out.track.title, "Kesariya");
        assert_eq!(out.track.plays, 0);
        assert!(out.track.likes.is_empty());
        assert_eq!(out.usernames.get(&by).map(String::as_str), Some("ravi"));
    }

    #[tokio::test]
    async fn add_rejects_duplicates_and_bad_input() {
        let f = Fixture::new();
        let by = f.user("ravi", Role::Member).await;
        let interactor = add_with(&f);

        add::Usecase::handle(&interactor, input("Kesariya", "Arijit", "Hindi", by))
            .await
            .unwrap();

        assert!(matches!(
            add::Usecase::handle(&interactor, input("Kesariya", "Arijit", "Hindi", by)).await,
            Err(AppError::DuplicateKey(_))
        ));
        assert!(matches!(
            add::Usecase::handle(&interactor, input("Other", "Arijit", "hindi", by)).await,
            Err(AppError::Validation(_))
        ));

        let mut missing = input("", "Arijit", "Hindi", by);
        missing.audio_url = None;
        match add::Usecase::handle(&interactor, missing).await {
            Err(AppError::Validation(msg)) => {
                assert!(msg.contains("Title is required"));
                assert!(msg.contains("Audio URL is required"));
            },
            other => panic!("unexpected: {:?}", other.map(|o| o.track)),
        }
    }

    #[tokio::test]
    async fn like_twice_restores_the_set() {
        let f = Fixture::new();
        let by = f.user("ravi", Role::Member).await;
        let id = add_track(&f, "Kesariya", "Hindi", by).await;
        let interactor = MusicLikeInteractor {
            music_repository: f.musics.clone(),
        };

        let first = like::Usecase::handle(&interactor, like::Input { music_id: id, user_id: by })
            .await
            .unwrap();
        assert!(first.liked);
        assert!(first.track.likes.contains(&by));

        let second = like::Usecase::handle(&interactor, like::Input { music_id: id, user_id: by })
            .await
            .unwrap();
        assert!(!second.liked);
        assert!(second.track.likes.is_empty());
    }

    #[tokio::test]
    async fn concurrent_likes_by_distinct_users_all_land() {
        let f = Fixture::new();
        let by = f.user("ravi", Role::Member).await;
        let id = add_track(&f, "Kesariya", "Hindi", by).await;
        let interactor = Arc::new(MusicLikeInteractor {
            music_repository: f.musics.clone(),
        });

        let handles = (0..32)
            .map(|_| {
                let interactor = interactor.clone();
                tokio::spawn(async move {
                    like::Usecase::handle(&*interactor, like::Input {
                        music_id: id,
                        user_id: Uuid::new_v4().into(),
                    })
                    .await
                    .unwrap()
                })
            })
            .collect::<Vec<_>>();
        for h in handles {
            assert!(h.await.unwrap().liked);
        }

        assert_eq!(f.musics.find(id).await.unwrap().likes.len(), 32);
    }

    #[tokio::test]
    async fn racing_toggles_settle_by_parity() {
        let f = Fixture::new();
        let by = f.user("ravi", Role::Member).await;
        let id = add_track(&f, "Kesariya", "Hindi", by).await;
        let interactor = Arc::new(MusicLikeInteractor {
            music_repository: f.musics.clone(),
        });

        let fans: Vec<UserId> = (0..4).map(|_| Uuid::new_v4().into()).collect();
        let counts = [2, 3, 1, 4];

        let rounds = *counts.iter().max().unwrap();
        let handles = (0..rounds)
            .flat_map(|round| {
                fans.iter()
                    .zip(counts)
                    .filter(move |(_, n)| round < *n)
                    .map(|(fan, _)| *fan)
                    .collect::<Vec<_>>()
            })
            .map(|fan| {
                let interactor = interactor.clone();
                tokio::spawn(async move {
                    like::Usecase::handle(&*interactor, like::Input { music_id: id, user_id: fan })
                        .await
                        .unwrap()
                })
            })
            .collect::<Vec<_>>();
        for h in handles {
            h.await.unwrap();
        }

        let likes = f.musics.find(id).await.unwrap().likes;
        assert_eq!(likes, HashSet::from([fans[1], fans[2]]));
    }

    #[tokio::test]
    async fn play_counts_and_reports_missing() {
        let f = Fixture::new();
        let by = f.user("ravi", Role::Member).await;
        let id = add_track(&f, "Kesariya", "Hindi", by).await;
        let interactor = MusicPlayInteractor {
            music_repository: f.musics.clone(),
        };

        for expected in 1..=3 {
            let out = play::Usecase::handle(&interactor, play::Input { music_id: id })
                .await
                .unwrap();
            assert_eq!(out.plays, expected);
        }

        let missing = play::Usecase::handle(&interactor, play::Input {
            music_id: Uuid::new_v4().into(),
        })
        .await;
        assert!(matches!(missing, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn list_filters_and_rejects_unknown_values() {
        let f = Fixture::new();
        let by = f.user("ravi", Role::Member).await;
        add_track(&f, "Kesariya", "Hindi", by).await;
        add_track(&f, "Vaathi Coming", "Tamil", by).await;
        let interactor = MusicListInteractor {
            music_repository: f.musics.clone(),
            user_repository: f.users.clone(),
        };
        let query = |language: &str, search: Option<&str>, sort: Option<&str>| list::Input {
            language: Some(language.to_string()),
            search: search.map(str::to_string),
            sort: sort.map(str::to_string),
        };

        let all = list::Usecase::handle(&interactor, query("all", None, None))
            .await
            .unwrap();
        assert_eq!(all.tracks.len(), 2);
        assert_eq!(all.usernames.get(&by).map(String::as_str), Some("ravi"));

        let tamil = list::Usecase::handle(&interactor, query("Tamil", None, None))
            .await
            .unwrap();
        assert_eq!(tamil.tracks.len(), 1);
        assert_eq!(tamil.tracks[0].title, "Vaathi Coming");

        let searched = list::Usecase::handle(&interactor, query("", Some("kesariya"), None))
            .await
            .unwrap();
        assert_eq!(searched.tracks.len(), 1);

        for bad in [query("Klingon", None, None), query("all", None, Some("artist"))] {
            assert!(matches!(
                list::Usecase::handle(&interactor, bad).await,
                Err(AppError::Validation(_))
            ));
        }
    }

    #[tokio::test]
    async fn trending_is_ordered_by_plays() {
        let f = Fixture::new();
        let by = f.user("ravi", Role::Member).await;
        let quiet = add_track(&f, "Quiet", "English", by).await;
        let loud = add_track(&f, "Loud", "English", by).await;
        for _ in 0..3 {
            f.musics.increment_plays(loud).await.unwrap();
        }
        f.musics.increment_plays(quiet).await.unwrap();

        let out = trending::Usecase::handle(
            &MusicTrendingInteractor {
                music_repository: f.musics.clone(),
                user_repository: f.users.clone(),
            },
            trending::Input {},
        )
        .await
        .unwrap();

        assert_eq!(out.tracks.iter().map(|m| m.id).collect::<Vec<_>>(), vec![loud, quiet]);
    }
}
