use bevy::math::EulerRot;
use bevy::prelude::*;

use super::animation_plugin::BODY_HEIGHT;
use super::game_plugin::dog_bundle;
use crate::game::components::{DogBody, FollowCamera};

/// Park, light, the dog's visuals and the follow camera.
pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_scene);
    }
}

fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    // Lawn
    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(80.0, 80.0))),
        MeshMaterial3d(materials.add(Color::srgb(0.3, 0.55, 0.25))),
    ));

    // A few trees so motion is readable against the ground.
    let trunk = meshes.add(Cylinder::new(0.25, 2.0));
    let crown = meshes.add(Sphere::new(1.2));
    let bark = materials.add(Color::srgb(0.4, 0.28, 0.15));
    let leaves = materials.add(Color::srgb(0.15, 0.45, 0.15));
    for (x, z) in [(-8.0, -10.0), (6.0, -14.0), (12.0, 4.0), (-12.0, 8.0)] {
        commands
            .spawn((
                Mesh3d(trunk.clone()),
                MeshMaterial3d(bark.clone()),
                Transform::from_xyz(x, 1.0, z),
            ))
            .with_children(|parent| {
                parent.spawn((
                    Mesh3d(crown.clone()),
                    MeshMaterial3d(leaves.clone()),
                    Transform::from_xyz(0.0, 1.6, 0.0),
                ));
            });
    }

    commands.spawn((
        DirectionalLight {
            illuminance: 10_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(EulerRot::XYZ, -0.9, 0.4, 0.0)),
    ));

    // Dog: gameplay root with a posed body child.
    let fur = materials.add(Color::srgb(0.75, 0.55, 0.3));
    let dog = commands
        .spawn(dog_bundle(Transform::default()))
        .with_children(|parent| {
            parent
                .spawn((
                    DogBody,
                    Mesh3d(meshes.add(Cuboid::new(0.5, 0.5, 1.0))),
                    MeshMaterial3d(fur.clone()),
                    Transform::from_xyz(0.0, BODY_HEIGHT, 0.0),
                ))
                .with_children(|body| {
                    // Head sits toward -Z, the dog's forward.
                    body.spawn((
                        Mesh3d(meshes.add(Sphere::new(0.28))),
                        MeshMaterial3d(fur.clone()),
                        Transform::from_xyz(0.0, 0.3, -0.6),
                    ));
                });
        })
        .id();

    commands.spawn((Camera3d::default(), Transform::default(), FollowCamera::new(dog)));
}
