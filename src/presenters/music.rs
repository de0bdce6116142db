use serde::Serialize;

use super::UserRef;
use crate::entities::{Date, Language, MusicId, MusicTrack, UserId};
use crate::usecases::music::{add, like, list, trending};
use crate::usecases::Usernames;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MusicView {
    pub id: MusicId,
    pub title: String,
    pub artist: String,
    pub language: Language,
    pub image_url: String,
    pub audio_url: String,
    pub likes: Vec<UserId>,
    pub plays: u64,
    pub added_by: UserRef,
    pub created_at: Date,
    pub updated_at: Date,
}

impl MusicView {
    pub fn new(track: MusicTrack, usernames: &Usernames) -> Self {
        Self {
            id: track.id,
            added_by: UserRef::resolve(track.added_by, usernames),
            likes: sorted_likes(&track),
            title: track.title,
            artist: track.artist,
            language: track.language,
            image_url: track.image_url,
            audio_url: track.audio_url,
            plays: track.plays,
            created_at: track.created_at,
            updated_at: track.updated_at,
        }
    }
}

fn sorted_likes(track: &MusicTrack) -> Vec<UserId> {
    let mut likes = track.likes.iter().copied().collect::<Vec<_>>();
    likes.sort();
    likes
}

fn views(tracks: Vec<MusicTrack>, usernames: &Usernames) -> Vec<MusicView> {
    tracks
        .into_iter()
        .map(|t| MusicView::new(t, usernames))
        .collect()
}

impl From<list::Output> for Vec<MusicView> {
    fn from(list::Output { tracks, usernames }: list::Output) -> Self { views(tracks, &usernames) }
}

impl From<trending::Output> for Vec<MusicView> {
    fn from(trending::Output { tracks, usernames }: trending::Output) -> Self {
        views(tracks, &usernames)
    }
}

impl From<add::Output> for MusicView {
    fn from(add::Output { track, usernames }: add::Output) -> Self { MusicView::new(track, &usernames) }
}

/// A like toggle answers with the track's current like set.
pub fn likes(out: &like::Output) -> Vec<UserId> { sorted_likes(&out.track) }
