use std::collections::HashSet;
use std::fmt::Debug;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use super::{
    LikeRepository, MusicQuery, MusicRepository, MusicSort, PostRepository, Result,
    UserRepository,
};
use crate::entities::{
    BlogPost, Comment, Date, MusicId, MusicTrack, PostId, User, UserId,
};

mod helpers;
pub(crate) mod text;

use helpers::{find_index, find_mut, find_ref};

/// Every operation runs under one lock, so each is atomic per collection.
pub struct InMemoryRepository<T>(Mutex<Vec<T>>);

impl<T> InMemoryRepository<T> {
    pub fn new() -> Self { Self(Mutex::new(vec![])) }
}
impl<T> Default for InMemoryRepository<T> {
    fn default() -> Self { Self::new() }
}

#[async_trait]
impl UserRepository for InMemoryRepository<User> {
    async fn insert(&self, item: User) -> Result<bool> {
        let mut guard = self.0.lock().await;

        if guard
            .iter()
            .any(|u| u.id == item.id || u.username == item.username || u.email == item.email)
        {
            return Ok(false);
        }

        guard.push(item);
        Ok(true)
    }

    async fn find(&self, id: UserId) -> Result<User> {
        let guard = self.0.lock().await;

        Ok(find_ref(&guard, |u| u.id == id)?.clone())
    }

    async fn find_by_email(&self, email: &str) -> Result<User> {
        let guard = self.0.lock().await;

        Ok(find_ref(&guard, |u| u.email == email)?.clone())
    }

    async fn finds(&self, ids: HashSet<UserId>) -> Result<Vec<User>> {
        Ok(self
            .0
            .lock()
            .await
            .iter()
            .filter(|u| ids.contains(&u.id))
            .cloned()
            .collect())
    }
}

/// Documents carrying a like-set.
pub trait Likeable {
    type Id: PartialEq + Copy + Send + Sync + 'static;

    fn id(&self) -> Self::Id;
    fn likes_mut(&mut self) -> &mut HashSet<UserId>;
    fn touch(&mut self, at: Date);
}

impl Likeable for MusicTrack {
    type Id = MusicId;

    fn id(&self) -> MusicId { self.id }

    fn likes_mut(&mut self) -> &mut HashSet<UserId> { &mut self.likes }

    fn touch(&mut self, at: Date) { self.updated_at = at; }
}

impl Likeable for BlogPost {
    type Id = PostId;

    fn id(&self) -> PostId { self.id }

    fn likes_mut(&mut self) -> &mut HashSet<UserId> { &mut self.likes }

    fn touch(&mut self, at: Date) { self.updated_at = at; }
}

#[async_trait]
impl<T> LikeRepository<T::Id> for InMemoryRepository<T>
where T: Likeable + Debug + Send
{
    async fn insert_liked(&self, id: T::Id, user_id: UserId) -> Result<bool> {
        let mut guard = self.0.lock().await;
        let item = find_mut(&mut guard, |v| v.id() == id)?;

        let changed = item.likes_mut().insert(user_id);
        if changed {
            item.touch(Utc::now());
        }

        Ok(changed)
    }

    async fn delete_liked(&self, id: T::Id, user_id: UserId) -> Result<bool> {
        let mut guard = self.0.lock().await;
        let item = find_mut(&mut guard, |v| v.id() == id)?;

        let changed = item.likes_mut().remove(&user_id);
        if changed {
            item.touch(Utc::now());
        }

        Ok(changed)
    }
}

fn sort_music(tracks: &mut [MusicTrack], sort: MusicSort) {
    match sort {
        MusicSort::CreatedAt => tracks.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        MusicSort::Plays => tracks.sort_by(|a, b| b.plays.cmp(&a.plays)),
        MusicSort::Title => tracks.sort_by(|a, b| b.title.cmp(&a.title)),
    }
}

#[async_trait]
impl MusicRepository for InMemoryRepository<MusicTrack> {
    async fn insert(&self, item: MusicTrack) -> Result<bool> {
        let mut guard = self.0.lock().await;

        if guard
            .iter()
            .any(|m| m.id == item.id || (m.title == item.title && m.artist == item.artist))
        {
            return Ok(false);
        }

        guard.push(item);
        Ok(true)
    }

    async fn find(&self, id: MusicId) -> Result<MusicTrack> {
        let guard = self.0.lock().await;

        Ok(find_ref(&guard, |m| m.id == id)?.clone())
    }

    async fn finds(
        &self,
        MusicQuery {
            language,
            text: search,
            sort,
            limit,
        }: MusicQuery,
    ) -> Result<Vec<MusicTrack>> {
        let mut tracks = self
            .0
            .lock()
            .await
            .iter()
            .filter(|m| language.map(|l| m.language == l).unwrap_or(true))
            .filter(|m| {
                search
                    .as_ref()
                    .map(|s| text::matches(s, [m.title.as_str(), m.artist.as_str()]))
                    .unwrap_or(true)
            })
            .cloned()
            .collect::<Vec<_>>();

        sort_music(&mut tracks, sort);
        if let Some(limit) = limit {
            tracks.truncate(limit);
        }

        Ok(tracks)
    }

    async fn increment_plays(&self, id: MusicId) -> Result<u64> {
        let mut guard = self.0.lock().await;
        let item = find_mut(&mut guard, |m| m.id == id)?;

        item.plays += 1;
        item.updated_at = Utc::now();

        Ok(item.plays)
    }
}

#[async_trait]
impl PostRepository for InMemoryRepository<BlogPost> {
    async fn insert(&self, item: BlogPost) -> Result<bool> {
        let mut guard = self.0.lock().await;

        if guard.iter().any(|p| p.id == item.id) {
            return Ok(false);
        }

        guard.push(item);
        Ok(true)
    }

    async fn find(&self, id: PostId) -> Result<BlogPost> {
        let guard = self.0.lock().await;

        Ok(find_ref(&guard, |p| p.id == id)?.clone())
    }

    async fn finds(&self) -> Result<Vec<BlogPost>> {
        let mut posts = self.0.lock().await.clone();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(posts)
    }

    async fn push_comment(&self, id: PostId, comment: Comment) -> Result<()> {
        let mut guard = self.0.lock().await;
        let item = find_mut(&mut guard, |p| p.id == id)?;

        item.updated_at = comment.created_at;
        item.comments.push(comment);

        Ok(())
    }

    async fn delete(&self, id: PostId) -> Result<BlogPost> {
        let mut guard = self.0.lock().await;
        let index = find_index(&guard, |p| p.id == id)?;

        Ok(guard.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use uuid::Uuid;

    use super::*;
    use crate::entities::{CommentId, Language, Role};
    use crate::repositories::RepositoryError;

    fn track(title: &str, artist: &str, language: Language) -> MusicTrack {
        let now = Utc::now();
        MusicTrack {
            id: Uuid::new_v4().into(),
            title: title.to_string(),
            artist: artist.to_string(),
            language,
            image_url: "https://img.example/cover.png".to_string(),
            audio_url: "https://audio.example/track.mp3".to_string(),
            likes: HashSet::new(),
            plays: 0,
            added_by: Uuid::new_v4().into(),
            created_at: now,
            updated_at: now,
        }
    }

    fn user(username: &str, email: &str) -> User {
        User {
            id: Uuid::new_v4().into(),
            username: username.to_string(),
            email: email.to_string(),
            password_hash: "x".to_string(),
            role: Role::Member,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn user_insert_rejects_taken_username_or_email() {
        let repo = InMemoryRepository::<User>::new();

        assert!(repo.insert(user("asha", "asha@example.com")).await.unwrap());
        assert!(!repo.insert(user("asha", "other@example.com")).await.unwrap());
        assert!(!repo.insert(user("other", "asha@example.com")).await.unwrap());

        let ids = repo.0.lock().await.iter().map(|u| u.id).collect::<HashSet<_>>();
        assert_eq!(ids.len(), 1);
        assert_eq!(repo.finds(ids).await.unwrap()[0].username, "asha");
    }

    #[tokio::test]
    async fn like_set_never_duplicates() {
        let repo = InMemoryRepository::<MusicTrack>::new();
        let t = track("Tum Hi Ho", "Arijit Singh", Language::Hindi);
        let id = t.id;
        repo.insert(t).await.unwrap();
        let user_id: UserId = Uuid::new_v4().into();

        assert!(repo.insert_liked(id, user_id).await.unwrap());
        assert!(!repo.insert_liked(id, user_id).await.unwrap());
        assert_eq!(repo.find(id).await.unwrap().likes.len(), 1);

        assert!(repo.delete_liked(id, user_id).await.unwrap());
        assert!(!repo.delete_liked(id, user_id).await.unwrap());
        assert!(repo.find(id).await.unwrap().likes.is_empty());
    }

    #[tokio::test]
    async fn like_on_missing_document_is_not_found() {
        let repo = InMemoryRepository::<MusicTrack>::new();

        assert!(matches!(
            repo.insert_liked(Uuid::new_v4().into(), Uuid::new_v4().into()).await,
            Err(RepositoryError::NotFound)
        ));
    }

    #[tokio::test]
    async fn concurrent_plays_are_not_lost() {
        let repo = Arc::new(InMemoryRepository::<MusicTrack>::new());
        let t = track("Kesariya", "Arijit Singh", Language::Hindi);
        let id = t.id;
        repo.insert(t).await.unwrap();

        let handles = (0..64)
            .map(|_| {
                let repo = repo.clone();
                tokio::spawn(async move { repo.increment_plays(id).await.unwrap() })
            })
            .collect::<Vec<_>>();
        for h in handles {
            h.await.unwrap();
        }

        assert_eq!(repo.find(id).await.unwrap().plays, 64);
    }

    #[tokio::test]
    async fn music_pair_is_unique() {
        let repo = InMemoryRepository::<MusicTrack>::new();

        assert!(repo.insert(track("Believer", "Imagine Dragons", Language::English)).await.unwrap());
        assert!(!repo.insert(track("Believer", "Imagine Dragons", Language::English)).await.unwrap());
        assert!(repo.insert(track("Believer", "Someone Else", Language::English)).await.unwrap());
    }

    #[tokio::test]
    async fn finds_filters_and_sorts() {
        let repo = InMemoryRepository::<MusicTrack>::new();
        let mut a = track("Tum Hi Ho", "Arijit Singh", Language::Hindi);
        a.plays = 5;
        let mut b = track("Shape of You", "Ed Sheeran", Language::English);
        b.plays = 9;
        let c = track("Kesariya", "Arijit Singh", Language::Hindi);
        for t in [a, b, c] {
            repo.insert(t).await.unwrap();
        }

        let hindi = repo
            .finds(MusicQuery {
                language: Some(Language::Hindi),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(hindi.len(), 2);
        assert!(hindi.iter().all(|m| m.language == Language::Hindi));

        let arijit = repo
            .finds(MusicQuery {
                text: Some("Arijit".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(arijit.len(), 2);
        assert!(arijit.iter().all(|m| m.artist == "Arijit Singh"));

        let top = repo
            .finds(MusicQuery {
                sort: MusicSort::Plays,
                limit: Some(1),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].title, "Shape of You");
    }

    #[tokio::test]
    async fn comments_keep_arrival_order() {
        let repo = InMemoryRepository::<BlogPost>::new();
        let now = Utc::now();
        let author: UserId = Uuid::new_v4().into();
        let post = BlogPost {
            id: Uuid::new_v4().into(),
            title: "t".to_string(),
            content: "c".to_string(),
            excerpt: "e".to_string(),
            image_url: "i".to_string(),
            tags: vec![],
            music_track: None,
            author,
            likes: HashSet::new(),
            comments: vec![],
            created_at: now,
            updated_at: now,
        };
        let id = post.id;
        repo.insert(post).await.unwrap();

        for text in ["first", "second", "third"] {
            repo.push_comment(id, Comment {
                id: CommentId(Uuid::new_v4()),
                author,
                text: text.to_string(),
                created_at: Utc::now(),
            })
            .await
            .unwrap();
        }

        let texts = repo
            .find(id)
            .await
            .unwrap()
            .comments
            .into_iter()
            .map(|c| c.text)
            .collect::<Vec<_>>();
        assert_eq!(texts, ["first", "second", "third"]);

        repo.delete(id).await.unwrap();
        assert!(matches!(repo.find(id).await, Err(RepositoryError::NotFound)));
    }
}
