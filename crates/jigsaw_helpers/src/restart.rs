use bevy::prelude::*;

/// Marks entities that belong to one round of the puzzle and go away on restart.
#[derive(Component)]
pub struct CleanupMarker;

pub fn despawn_marked_entities(
    commands: &mut Commands,
    query: &Query<Entity, With<CleanupMarker>>,
) {
    for entity in query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}
