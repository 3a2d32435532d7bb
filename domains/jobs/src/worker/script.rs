//! Parametric Blender script generation
//!
//! Renders a standalone Python script that builds a base plate with a
//! circular through-hole pattern and a bevel fillet, exports an STL, and
//! renders a preview PNG. The script is self-contained: it is stored as a
//! `ScriptVersion` and later executed with `blender -b -P`.

use uuid::Uuid;

use meshforge_extraction::ExtractionResult;

/// Geometry parameters fed into the script template (all lengths in mm)
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptParams {
    pub length: f64,
    pub width: f64,
    pub thickness: f64,
    pub hole_diameter: f64,
    pub hole_count: i64,
    pub ring_radius: f64,
    pub fillet_radius: f64,
}

/// Derive script parameters from the latest extraction result, with
/// explicit overrides from the job's `params` object taking precedence.
pub fn script_params_from(extraction: &ExtractionResult, params: &serde_json::Value) -> ScriptParams {
    let length = extraction
        .dimension("overall_length_mm")
        .or_else(|| extraction.dimension("overall_length"))
        .unwrap_or(120.0);
    let width = extraction
        .dimension("overall_width")
        .unwrap_or(length * 0.45);
    let thickness = params
        .get("thickness")
        .and_then(|v| v.as_f64())
        .or_else(|| extraction.dimension("overall_height"))
        .unwrap_or(5.0);
    let hole_diameter = extraction
        .dimension("hole_diameter")
        .unwrap_or(length * 0.08);
    let hole_count = params
        .get("hole_count")
        .and_then(|v| v.as_i64())
        .unwrap_or(8);
    let ring_radius = params
        .get("hole_ring_radius")
        .and_then(|v| v.as_f64())
        .unwrap_or(length.min(width) * 0.35);
    let fillet_radius = params
        .get("fillet_radius")
        .and_then(|v| v.as_f64())
        .unwrap_or(length * 0.02);

    ScriptParams {
        length,
        width,
        thickness,
        hole_diameter,
        hole_count,
        ring_radius,
        fillet_radius,
    }
}

/// Render the Blender Python script for a project
pub fn build_blender_script(project_id: Uuid, p: &ScriptParams) -> String {
    let ScriptParams {
        length,
        width,
        thickness,
        hole_diameter,
        hole_count,
        ring_radius,
        fillet_radius,
    } = p;

    format!(
        r#"#!/usr/bin/env blender --python
"""
Meshforge - Generated Blender Script
Project ID: {project_id}
Generated: Automated from dimension extraction

Parameters:
- Length (L): {length} mm
- Width (W): {width} mm
- Thickness (T): {thickness} mm
- Hole Diameter: {hole_diameter} mm
- Hole Count: {hole_count}
- Ring Radius: {ring_radius} mm
- Fillet Radius: {fillet_radius} mm
"""

import bpy
import math
from mathutils import Vector

print("=" * 60)
print("Meshforge - Blender Script Execution")
print("=" * 60)

# ===== Parameters (mm -> Blender units; 1 unit = 1 mm) =====
L = {length}
W = {width}
T = {thickness}
hole_d = {hole_diameter}
hole_r = hole_d / 2.0
hole_count = {hole_count}
ring_radius = {ring_radius}
fillet_r = {fillet_radius}

print(f"Dimensions: L={{L}}, W={{W}}, T={{T}}")
print(f"Holes: {{hole_count}}x d={{hole_d}} at R={{ring_radius}}")

# ===== Clean Scene =====
print("Cleaning scene...")
bpy.ops.object.select_all(action='SELECT')
bpy.ops.object.delete(use_global=False)

for block in bpy.data.meshes:
    if block.users == 0:
        bpy.data.meshes.remove(block)

# ===== Create Base Plate =====
print("Creating base plate...")
bpy.ops.mesh.primitive_cube_add(size=1, location=(0, 0, T/2))
plate = bpy.context.active_object
plate.name = "BasePlate"
plate.scale = (L/2, W/2, T/2)
bpy.ops.object.transform_apply(location=False, rotation=False, scale=True)

# ===== Create Hole Pattern =====
if hole_count > 0 and hole_r > 0:
    print(f"Creating {{hole_count}} holes...")

    bpy.ops.mesh.primitive_cylinder_add(
        radius=hole_r,
        depth=T * 3,
        location=(ring_radius, 0, T/2)
    )
    cutter = bpy.context.active_object
    cutter.name = "HoleCutter_0"

    cutters = [cutter]
    for i in range(1, hole_count):
        ang = (2 * math.pi) * (i / hole_count)
        x = math.cos(ang) * ring_radius
        y = math.sin(ang) * ring_radius

        dup = cutter.copy()
        dup.data = cutter.data.copy()
        dup.location = (x, y, T/2)
        dup.name = f"HoleCutter_{{i}}"
        bpy.context.collection.objects.link(dup)
        cutters.append(dup)

    for obj in cutters:
        obj.select_set(True)
    bpy.context.view_layer.objects.active = cutter
    bpy.ops.object.join()
    joined_cutter = bpy.context.active_object
    joined_cutter.name = "JoinedCutters"

    print("Applying boolean difference...")
    plate.select_set(True)
    bpy.context.view_layer.objects.active = plate
    mod = plate.modifiers.new(name="HoleBoolean", type='BOOLEAN')
    mod.operation = 'DIFFERENCE'
    mod.object = joined_cutter

    bpy.ops.object.modifier_apply(modifier=mod.name)

    joined_cutter.select_set(True)
    bpy.ops.object.delete(use_global=False)

# ===== Add Bevel (Fillet) =====
if fillet_r > 0:
    print(f"Adding bevel (fillet) with radius {{fillet_r}}...")
    bpy.context.view_layer.objects.active = plate
    bevel_mod = plate.modifiers.new(name="Bevel", type='BEVEL')
    bevel_mod.width = fillet_r
    bevel_mod.segments = 3
    bevel_mod.limit_method = 'ANGLE'
    bpy.ops.object.modifier_apply(modifier=bevel_mod.name)

# ===== Export STL =====
output_stl = bpy.path.abspath("//output_{project_id}.stl")
print(f"Exporting STL to: {{output_stl}}")
bpy.ops.export_mesh.stl(filepath=output_stl, use_selection=False)

# ===== Render Preview =====
print("Setting up render...")
bpy.context.scene.render.engine = 'BLENDER_EEVEE'
bpy.context.scene.render.resolution_x = 1920
bpy.context.scene.render.resolution_y = 1080
bpy.context.scene.render.film_transparent = True

bpy.ops.object.camera_add(location=(L*1.5, -W*1.5, L*0.8))
camera = bpy.context.active_object
camera.rotation_euler = (math.radians(60), 0, math.radians(45))
bpy.context.scene.camera = camera

bpy.ops.object.light_add(type='SUN', location=(L, -W, L*2))
light = bpy.context.active_object
light.data.energy = 3.0

render_path = bpy.path.abspath("//render_{project_id}.png")
print(f"Rendering preview to: {{render_path}}")
bpy.context.scene.render.filepath = render_path
bpy.ops.render.render(write_still=True)

print("=" * 60)
print("SUCCESS: Export and render completed")
print("=" * 60)
"#
    )
}
