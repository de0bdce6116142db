use bson::DateTime;

#[derive(Debug, Clone, ::serde::Serialize, ::serde::Deserialize)]
pub struct MongoUserModel {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime,
}

#[derive(Debug, Clone, ::serde::Serialize, ::serde::Deserialize)]
pub struct MongoMusicModel {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub language: String,
    pub image_url: String,
    pub audio_url: String,
    pub likes: Vec<String>,
    pub plays: i64,
    pub added_by: String,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Clone, ::serde::Serialize, ::serde::Deserialize)]
pub struct MongoPostModel {
    pub id: String,
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub image_url: String,
    pub tags: Vec<String>,
    pub music_track: Option<MongoTrackRefModel>,
    pub author: String,
    pub likes: Vec<String>,
    pub comments: Vec<MongoCommentModel>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Clone, ::serde::Serialize, ::serde::Deserialize)]
pub struct MongoTrackRefModel {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub url: Option<String>,
    pub language: Option<String>,
}

#[derive(Debug, Clone, ::serde::Serialize, ::serde::Deserialize)]
pub struct MongoCommentModel {
    pub id: String,
    pub author: String,
    pub text: String,
    pub created_at: DateTime,
}
