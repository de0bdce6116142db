use serde::Serialize;

use super::UserRef;
use crate::entities::{BlogPost, Comment, CommentId, Date, PostId, TrackRef};
use crate::usecases::blog::{comment, create, get, like, list};
use crate::usecases::Usernames;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackRefView {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub url: Option<String>,
    pub language: Option<String>,
}

impl From<TrackRef> for TrackRefView {
    fn from(
        TrackRef {
            title,
            artist,
            url,
            language,
        }: TrackRef,
    ) -> Self {
        Self {
            title,
            artist,
            url,
            language,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub id: CommentId,
    pub user: UserRef,
    pub text: String,
    pub created_at: Date,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    pub id: PostId,
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub image_url: String,
    pub tags: Vec<String>,
    pub music_track: Option<TrackRefView>,
    pub author: UserRef,
    pub likes: Vec<UserRef>,
    pub comments: Vec<CommentView>,
    pub created_at: Date,
    pub updated_at: Date,
}

impl PostView {
    pub fn new(post: BlogPost, usernames: &Usernames) -> Self {
        let mut likes = post.likes.into_iter().collect::<Vec<_>>();
        likes.sort();

        Self {
            id: post.id,
            title: post.title,
            content: post.content,
            excerpt: post.excerpt,
            image_url: post.image_url,
            tags: post.tags,
            music_track: post.music_track.map(Into::into),
            author: UserRef::resolve(post.author, usernames),
            likes: likes
                .into_iter()
                .map(|id| UserRef::resolve(id, usernames))
                .collect(),
            comments: post
                .comments
                .into_iter()
                .map(|Comment { id, author, text, created_at }| CommentView {
                    id,
                    user: UserRef::resolve(author, usernames),
                    text,
                    created_at,
                })
                .collect(),
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

impl From<list::Output> for Vec<PostView> {
    fn from(list::Output { posts, usernames }: list::Output) -> Self {
        posts
            .into_iter()
            .map(|p| PostView::new(p, &usernames))
            .collect()
    }
}

impl From<get::Output> for PostView {
    fn from(get::Output { post, usernames }: get::Output) -> Self { PostView::new(post, &usernames) }
}

impl From<create::Output> for PostView {
    fn from(create::Output { post, usernames }: create::Output) -> Self {
        PostView::new(post, &usernames)
    }
}

impl From<like::Output> for PostView {
    fn from(like::Output { post, usernames, .. }: like::Output) -> Self {
        PostView::new(post, &usernames)
    }
}

impl From<comment::Output> for PostView {
    fn from(comment::Output { post, usernames }: comment::Output) -> Self {
        PostView::new(post, &usernames)
    }
}
