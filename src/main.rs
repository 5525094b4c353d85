use std::env;
use std::process::ExitCode;

use log::{error, info};
use viewer::asset::loader::gltf::load_from_path;
use viewer::asset::material::AlphaMode;
use viewer::scene::model::Model;

const FRAME_STEP: f32 = 1.0 / 60.0;

fn print_summary(model: &Model) {
    info!(
        "loaded \"{}\": {} nodes, {} meshes, {} materials, {} skins, {} animations",
        model.name.as_deref().unwrap_or("unnamed"),
        model.nodes.len(),
        model.meshes.len(),
        model.materials.len(),
        model.skins.len(),
        model.animations.len(),
    );
    info!(
        "buffers: {} vertices, {} indices",
        model.vertices.len(),
        model.indices.len()
    );
    if model.dimensions.is_defined() {
        info!(
            "dimensions: min {:?} max {:?}",
            model.dimensions.min, model.dimensions.max
        );
    } else {
        info!("dimensions: undefined (no bounded geometry)");
    }
    for (index, animation) in model.animations.iter().enumerate() {
        info!(
            "animation {index} \"{}\": {} channels, [{:.3}s, {:.3}s]",
            animation.name,
            animation.channels.len(),
            animation.start,
            animation.end,
        );
    }
}

fn print_draw_order(model: &Model) {
    for alpha_mode in [AlphaMode::Opaque, AlphaMode::Mask, AlphaMode::Blend] {
        let mut primitives = 0usize;
        let mut indices = 0u32;
        model.for_each_primitive(alpha_mode, &mut |_, _, primitive| {
            primitives += 1;
            indices += primitive.index_count;
        });
        info!("{alpha_mode:?} pass: {primitives} primitives, {indices} indices");
    }
}

/// Step the first animation through one full playback at a fixed frame
/// rate, keeping time inside the animation's own range.
fn run_animation_once(model: &mut Model) {
    let Some(animation) = model.animation(0) else {
        return;
    };
    let (start, end) = (animation.start, animation.end);
    let frames = (((end - start) / FRAME_STEP).ceil() as usize).max(1);
    info!("stepping animation 0 over {frames} frames");
    for frame in 0..=frames {
        let time = (start + frame as f32 * FRAME_STEP).min(end);
        model.update_animation(0, time);
        model.update();
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let Some(path) = env::args().nth(1) else {
        error!("usage: viewer <model.gltf|model.glb>");
        return ExitCode::FAILURE;
    };

    let document = match load_from_path(&path) {
        Ok(document) => document,
        Err(err) => {
            error!("failed to read \"{path}\": {err}");
            return ExitCode::FAILURE;
        }
    };
    let mut model = match Model::from_document(document) {
        Ok(model) => model,
        Err(err) => {
            error!("failed to build scene from \"{path}\": {err}");
            return ExitCode::FAILURE;
        }
    };

    print_summary(&model);
    print_draw_order(&model);
    run_animation_once(&mut model);

    ExitCode::SUCCESS
}
