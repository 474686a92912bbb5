use crate::mpris::{MprisHandle, PlaybackStatus};
use crate::player::Player;

pub fn update_mpris(mpris: &MprisHandle, player: &Player) {
    mpris.set_track_metadata(player.current_track());
    mpris.set_status(PlaybackStatus::of(player));
}
