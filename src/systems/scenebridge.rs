//! Scene bridge systems.
//!
//! - [`publish_stats`] turns queued ledger snapshots into
//!   [`SceneCmd::Stats`] messages.
//! - [`forward_scene_cmds`] pushes every [`SceneCmd`] written this frame down
//!   the [`SceneBridge`] channel.
//! - [`update_scene_cmd_messages`] advances the message queue.
//!
//! Run them chained, in that order, at the end of the tick.

use bevy_ecs::prelude::*;
use log::warn;

use crate::events::scene::SceneCmd;
use crate::resources::economy::EconomyLedger;
use crate::resources::scenebridge::SceneBridge;

pub fn publish_stats(mut ledger: ResMut<EconomyLedger>, mut writer: MessageWriter<SceneCmd>) {
    let pending = ledger.bypass_change_detection().drain_notifications();
    writer.write_batch(pending.into_iter().map(SceneCmd::Stats));
}

/// Forward this frame's [`SceneCmd`]s to the collaborator.
///
/// Without a bridge the messages are consumed and dropped. A disconnected
/// receiver is reported once per frame and otherwise ignored.
pub fn forward_scene_cmds(bridge: Option<Res<SceneBridge>>, mut reader: MessageReader<SceneCmd>) {
    let Some(bridge) = bridge else {
        let _ = reader.read().count();
        return;
    };
    let mut dropped = 0usize;
    for cmd in reader.read() {
        if bridge.tx_cmd.send(cmd.clone()).is_err() {
            dropped += 1;
        }
    }
    if dropped > 0 {
        warn!("Scene collaborator disconnected, dropped {} commands", dropped);
    }
}

/// Advance the ECS message queue for [`SceneCmd`].
pub fn update_scene_cmd_messages(mut msgs: ResMut<Messages<SceneCmd>>) {
    msgs.update();
}
