use cgmath::{Deg, Matrix4, SquareMatrix, Vector3};
use log::info;

use super::{
    object::GpuMesh,
    rig::{DrawItem, FrameDraw, MeshId, Rig},
};
use crate::{
    config::{RocketConfig, ViewerConfig},
    error::ViewerResult,
    gfx::{
        camera::ViewerCamera,
        geometry::{
            concatenate, load_wavefront_obj, make_cone, make_cylinder, make_square_cone,
            static_cube, CubeColor, CubeSize, MeshData,
        },
    },
    simulation::RocketPose,
};

const ROUND_SUBDIVISIONS: usize = 24;
const ENGINE_SUBDIVISIONS: usize = 12;

const BODY_LENGTH: f32 = 1.2;
const BODY_RADIUS: f32 = 0.15;
const NOSE_LENGTH: f32 = 0.4;
/// Top of the launchpad disc, below the engines
const PAD_TOP: f32 = -0.2;

/// Instrument board position relative to the launch point
const GAUGE_OFFSET: Vector3<f32> = Vector3::new(1.5, 0.5, 0.0);
/// Pointer pivot relative to the board's centre, just in front of its face
const POINTER_PIVOT: Vector3<f32> = Vector3::new(0.0, 0.0, 0.1);

/// CPU-side meshes, addressed by [`MeshId`] in load order
#[derive(Debug, Clone, Default)]
pub struct MeshLibrary {
    entries: Vec<(&'static str, MeshData)>,
}

impl MeshLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, label: &'static str, mesh: MeshData) -> MeshId {
        self.entries.push((label, mesh));
        MeshId(self.entries.len() - 1)
    }

    pub fn get(&self, id: MeshId) -> Option<&MeshData> {
        self.entries.get(id.0).map(|(_, mesh)| mesh)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &MeshData)> {
        self.entries.iter().map(|(label, mesh)| (*label, mesh))
    }
}

fn rgb(r: f32, g: f32, b: f32) -> Vector3<f32> {
    Vector3::new(r, g, b)
}

/// Lays the generators' +X axis along +Y
fn x_axis_to_y() -> Matrix4<f32> {
    Matrix4::from_angle_z(Deg(90.0))
}

fn rocket_body() -> MeshData {
    make_cylinder(
        true,
        ROUND_SUBDIVISIONS,
        rgb(0.85, 0.85, 0.9),
        x_axis_to_y() * Matrix4::from_nonuniform_scale(BODY_LENGTH, BODY_RADIUS, BODY_RADIUS),
    )
}

fn rocket_nose() -> MeshData {
    make_cone(
        true,
        ROUND_SUBDIVISIONS,
        rgb(0.8, 0.1, 0.1),
        Matrix4::from_translation(Vector3::new(0.0, BODY_LENGTH, 0.0))
            * x_axis_to_y()
            * Matrix4::from_nonuniform_scale(NOSE_LENGTH, BODY_RADIUS, BODY_RADIUS),
    )
}

/// One fin standing out along +X from the body surface
fn rocket_fin() -> MeshData {
    make_square_cone(
        true,
        rgb(0.6, 0.05, 0.05),
        Matrix4::from_translation(Vector3::new(BODY_RADIUS, 0.2, 0.0))
            * Matrix4::from_angle_y(Deg(90.0))
            * Matrix4::from_nonuniform_scale(0.04, 0.4, 0.3),
    )
}

/// Engine bell hanging below the body, nozzle pointing down
fn rocket_engine() -> MeshData {
    let casing = make_cylinder(
        true,
        ENGINE_SUBDIVISIONS,
        rgb(0.25, 0.25, 0.28),
        Matrix4::from_translation(Vector3::new(0.0, -0.12, 0.0))
            * x_axis_to_y()
            * Matrix4::from_nonuniform_scale(0.12, 0.045, 0.045),
    );
    let nozzle = make_cone(
        false,
        ENGINE_SUBDIVISIONS,
        rgb(0.1, 0.1, 0.1),
        Matrix4::from_translation(Vector3::new(0.0, -0.08, 0.0))
            * Matrix4::from_angle_z(Deg(-90.0))
            * Matrix4::from_nonuniform_scale(0.08, 0.06, 0.06),
    );
    concatenate(casing, &nozzle)
}

/// Round pad with a service tower on one side
fn launchpad() -> MeshData {
    let pad = make_cylinder(
        true,
        ROUND_SUBDIVISIONS,
        rgb(0.45, 0.45, 0.45),
        Matrix4::from_translation(Vector3::new(0.0, PAD_TOP - 0.1, 0.0))
            * x_axis_to_y()
            * Matrix4::from_nonuniform_scale(0.1, 0.6, 0.6),
    );
    let tower = make_square_cone(
        true,
        rgb(0.75, 0.55, 0.1),
        Matrix4::from_translation(Vector3::new(0.45, PAD_TOP, 0.0))
            * Matrix4::from_angle_x(Deg(-90.0))
            * Matrix4::from_nonuniform_scale(0.15, 0.15, 1.6),
    );
    concatenate(pad, &tower)
}

/// Placement of every part, independent of any GPU resources
///
/// Draw order is fixed: rocket (body, nose, fins, engines), instrument board,
/// heading pointer, launchpad, terrain.
#[derive(Debug, Clone)]
pub struct SceneLayout {
    rocket: Rig,
    gauge: Rig,
    pointer: Rig,
    ground: Rig,
    gauge_root: Matrix4<f32>,
    launch_root: Matrix4<f32>,
}

impl SceneLayout {
    /// Generates the procedural meshes and builds the rigs around `terrain`
    pub fn assemble(rocket: &RocketConfig, terrain: MeshData) -> (Self, MeshLibrary) {
        let mut library = MeshLibrary::new();

        let body = library.add("Rocket Body", rocket_body());
        let nose = library.add("Rocket Nose", rocket_nose());
        let fin = library.add("Rocket Fin", rocket_fin());
        let engine = library.add("Rocket Engine", rocket_engine());
        let board = library.add("Gauge Board", static_cube(CubeSize::Large, CubeColor::Brown));
        let stand = library.add("Gauge Stand", static_cube(CubeSize::Small, CubeColor::Black));
        let needle = library.add("Gauge Pointer", static_cube(CubeSize::Small, CubeColor::Gold));
        let pad = library.add("Launchpad", launchpad());
        let ground = library.add("Terrain", terrain);

        let quarter_turn = |k: f32| Matrix4::from_angle_y(Deg(90.0 * k));
        let engine_at = |x: f32, z: f32| Matrix4::from_translation(Vector3::new(x, 0.0, z));
        let engine_spread = BODY_RADIUS * 0.55;

        let rocket_rig = Rig::new("rocket")
            .with_part("body", body, Matrix4::identity())
            .with_part("nose", nose, Matrix4::identity())
            .with_part("fin", fin, quarter_turn(0.0))
            .with_part("fin", fin, quarter_turn(1.0))
            .with_part("fin", fin, quarter_turn(2.0))
            .with_part("fin", fin, quarter_turn(3.0))
            .with_part("engine", engine, engine_at(engine_spread, engine_spread))
            .with_part("engine", engine, engine_at(-engine_spread, engine_spread))
            .with_part("engine", engine, engine_at(-engine_spread, -engine_spread))
            .with_part("engine", engine, engine_at(engine_spread, -engine_spread));

        let gauge_rig = Rig::new("gauge")
            .with_part("board", board, Matrix4::identity())
            .with_part(
                "stand",
                stand,
                Matrix4::from_translation(Vector3::new(0.0, -0.375, 0.0)),
            );

        // Pivot at the pointer's lower end so it swings like a needle
        let pointer_rig = Rig::new("pointer").with_part(
            "needle",
            needle,
            Matrix4::from_translation(Vector3::new(0.0, CubeSize::Small.half_extents().y, 0.0)),
        );

        let launch_point = Vector3::new(rocket.initial_x, rocket.initial_y, rocket.launch_z);
        let launch_root = Matrix4::from_translation(launch_point);

        let ground_rig = Rig::new("ground")
            .with_part("launchpad", pad, launch_root)
            .with_textured_part("terrain", ground, Matrix4::identity());

        info!(
            "Scene assembled: {} meshes, {} parts",
            library.len(),
            rocket_rig.parts.len()
                + gauge_rig.parts.len()
                + pointer_rig.parts.len()
                + ground_rig.parts.len()
        );

        let layout = Self {
            rocket: rocket_rig,
            gauge: gauge_rig,
            pointer: pointer_rig,
            ground: ground_rig,
            gauge_root: Matrix4::from_translation(launch_point + GAUGE_OFFSET),
            launch_root,
        };

        (layout, library)
    }

    /// Root of the rocket rig for the given pose
    pub fn rocket_root(pose: &RocketPose) -> Matrix4<f32> {
        Matrix4::from_translation(Vector3::new(pose.x, pose.y, pose.z))
            * Matrix4::from_angle_z(pose.heading)
    }

    pub fn launch_root(&self) -> Matrix4<f32> {
        self.launch_root
    }

    /// Every part placed for this frame, in draw order
    pub fn draw_items(&self, rocket: &RocketPose) -> Vec<DrawItem> {
        let pointer_root = self.gauge_root
            * Matrix4::from_translation(POINTER_PIVOT)
            * Matrix4::from_angle_z(rocket.heading);

        self.rocket
            .evaluate(Self::rocket_root(rocket))
            .chain(self.gauge.evaluate(self.gauge_root))
            .chain(self.pointer.evaluate(pointer_root))
            .chain(self.ground.evaluate(Matrix4::identity()))
            .collect()
    }
}

/// The uploaded scene: layout plus one GPU mesh per library entry
pub struct Scene {
    layout: SceneLayout,
    meshes: Vec<GpuMesh>,
}

impl Scene {
    /// Loads the terrain, generates everything else and uploads it all
    pub fn load(device: &wgpu::Device, config: &ViewerConfig) -> ViewerResult<Self> {
        let terrain = load_wavefront_obj(config.assets.terrain_obj_path())?;
        let (layout, library) = SceneLayout::assemble(&config.rocket, terrain);
        Self::upload(device, layout, &library)
    }

    pub fn upload(
        device: &wgpu::Device,
        layout: SceneLayout,
        library: &MeshLibrary,
    ) -> ViewerResult<Self> {
        let meshes = library
            .iter()
            .map(|(label, mesh)| GpuMesh::upload(device, label, mesh))
            .collect::<ViewerResult<Vec<_>>>()?;

        let vertices: u32 = meshes.iter().map(|mesh| mesh.vertex_count).sum();
        info!("Uploaded {} meshes, {} vertices", meshes.len(), vertices);

        Ok(Self { layout, meshes })
    }

    pub fn mesh(&self, id: MeshId) -> Option<&GpuMesh> {
        self.meshes.get(id.0)
    }

    /// Per-draw matrices for this frame, in draw order
    pub fn frame_draws(&self, camera: &ViewerCamera, rocket: &RocketPose) -> Vec<FrameDraw> {
        let view_proj = camera.build_view_projection_matrix(rocket);
        self.layout
            .draw_items(rocket)
            .iter()
            .map(|item| item.to_frame_draw(view_proj))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::RocketFlight;
    use approx::assert_relative_eq;
    use cgmath::{InnerSpace, Vector4};

    fn terrain() -> MeshData {
        make_square_cone(false, rgb(1.0, 1.0, 1.0), Matrix4::identity())
    }

    fn layout() -> (SceneLayout, MeshLibrary) {
        SceneLayout::assemble(&RocketConfig::default(), terrain())
    }

    fn grounded_pose() -> RocketPose {
        RocketFlight::new(RocketConfig::default()).pose()
    }

    #[test]
    fn every_generated_mesh_is_uploadable() {
        let (_, library) = layout();
        for (label, mesh) in library.iter() {
            assert!(mesh.validate().is_ok(), "{} is malformed", label);
            assert!(!mesh.is_empty(), "{} is empty", label);
        }
    }

    #[test]
    fn draw_order_is_fixed() {
        let (layout, _) = layout();
        let labels: Vec<_> = layout
            .draw_items(&grounded_pose())
            .iter()
            .map(|item| item.label)
            .collect();

        assert_eq!(
            labels,
            [
                "body", "nose", "fin", "fin", "fin", "fin", "engine", "engine", "engine",
                "engine", "board", "stand", "needle", "launchpad", "terrain"
            ]
        );
    }

    #[test]
    fn every_draw_references_a_library_mesh() {
        let (layout, library) = layout();
        for item in layout.draw_items(&grounded_pose()) {
            assert!(library.get(item.mesh).is_some());
        }
    }

    #[test]
    fn only_terrain_is_textured() {
        let (layout, _) = layout();
        let textured: Vec<_> = layout
            .draw_items(&grounded_pose())
            .into_iter()
            .filter(|item| item.textured)
            .map(|item| item.label)
            .collect();
        assert_eq!(textured, ["terrain"]);
    }

    #[test]
    fn rocket_parts_follow_the_root() {
        let (layout, _) = layout();
        let grounded = grounded_pose();
        let moved = RocketPose {
            x: grounded.x - 3.0,
            y: grounded.y + 2.0,
            ..grounded
        };

        let before = layout.draw_items(&grounded);
        let after = layout.draw_items(&moved);
        let origin = Vector4::new(0.0, 0.0, 0.0, 1.0);

        for (a, b) in before.iter().zip(&after).take(10) {
            let shift = b.model * origin - a.model * origin;
            assert_relative_eq!(shift.x, -3.0, epsilon = 1e-5);
            assert_relative_eq!(shift.y, 2.0, epsilon = 1e-5);
        }

        // Ground parts stay put
        assert_eq!(before[13].model, after[13].model);
        assert_eq!(before[14].model, after[14].model);
    }

    #[test]
    fn heading_tilts_nose_towards_negative_x() {
        let (layout, _) = layout();
        let pose = RocketPose {
            heading: Deg(45.0),
            ..grounded_pose()
        };
        let body = layout.draw_items(&pose)[0];

        let nose_dir = (body.model * Vector4::new(0.0, 1.0, 0.0, 0.0)).truncate().normalize();
        assert_relative_eq!(nose_dir.x, -std::f32::consts::FRAC_1_SQRT_2, epsilon = 1e-5);
        assert_relative_eq!(nose_dir.y, std::f32::consts::FRAC_1_SQRT_2, epsilon = 1e-5);
    }

    #[test]
    fn pointer_swings_with_heading() {
        let (layout, _) = layout();
        let upright = layout.draw_items(&grounded_pose())[12];
        let tilted = layout.draw_items(&RocketPose {
            heading: Deg(45.0),
            ..grounded_pose()
        })[12];

        let up = Vector4::new(0.0, 1.0, 0.0, 0.0);
        assert_relative_eq!((upright.model * up).x, 0.0, epsilon = 1e-6);
        assert!((tilted.model * up).x < 0.0);
    }

    #[test]
    fn launchpad_is_a_composite() {
        let (_, library) = layout();
        let pad = library
            .iter()
            .find(|(label, _)| *label == "Launchpad")
            .map(|(_, mesh)| mesh)
            .unwrap();

        // capped cylinder (24 * 12) followed by a capped square cone (18)
        assert_eq!(pad.vertex_count(), 24 * 12 + 18);
    }

    #[test]
    fn rocket_sits_above_the_pad() {
        let (layout, library) = layout();
        let items = layout.draw_items(&grounded_pose());
        let lowest_engine_y = library
            .get(items[6].mesh)
            .unwrap()
            .positions
            .iter()
            .map(|p| (items[6].model * p.extend(1.0)).y)
            .fold(f32::MAX, f32::min);
        let pad_top = (layout.launch_root() * Vector4::new(0.0, PAD_TOP, 0.0, 1.0)).y;

        assert!(lowest_engine_y > pad_top);
    }
}
