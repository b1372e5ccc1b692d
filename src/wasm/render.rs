use std::collections::HashMap;

use js_sys::{Float32Array, Uint32Array};
use wasm_bindgen::JsCast;
use web_sys::{
    HtmlCanvasElement, WebGl2RenderingContext as GL, WebGlBuffer, WebGlProgram, WebGlShader,
    WebGlUniformLocation, WebGlVertexArrayObject,
};

use crate::camera::PerspectiveCamera;
use crate::error::{FxError, Result};
use crate::frame::{DrawItem, DrawMode, Frame, FrameLight, Renderer};
use crate::material::{Shading, Side};
use crate::scene::{GeometryId, Scene};

const MAX_LIGHTS: usize = 4;

const VERTEX_SRC: &str = r#"#version 300 es
layout(location = 0) in vec3 a_position;
uniform mat4 u_view_projection;
uniform mat4 u_model;
uniform float u_point_size;
uniform float u_point_scale;
out vec3 v_world;
void main() {
    vec4 world = u_model * vec4(a_position, 1.0);
    v_world = world.xyz;
    gl_Position = u_view_projection * world;
    gl_PointSize = max(1.0, u_point_size * u_point_scale / max(gl_Position.w, 1e-4));
}
"#;

// Lit materials use a flat face normal from screen derivatives.
const FRAGMENT_SRC: &str = r#"#version 300 es
precision highp float;
in vec3 v_world;
uniform vec4 u_color;
uniform int u_lit;
uniform float u_shininess;
uniform vec3 u_ambient;
uniform vec3 u_eye;
uniform int u_light_count;
uniform vec4 u_light_pos[4];
uniform vec4 u_light_color[4];
out vec4 out_color;
void main() {
    vec3 rgb = u_color.rgb;
    if (u_lit == 1) {
        vec3 n = normalize(cross(dFdx(v_world), dFdy(v_world)));
        vec3 view = normalize(u_eye - v_world);
        if (dot(n, view) < 0.0) n = -n;
        vec3 diffuse = vec3(0.0);
        vec3 specular = vec3(0.0);
        for (int i = 0; i < 4; i++) {
            if (i >= u_light_count) break;
            vec3 l;
            float atten = 1.0;
            if (u_light_pos[i].w < 0.5) {
                l = -u_light_pos[i].xyz;
            } else {
                vec3 d = u_light_pos[i].xyz - v_world;
                float dist = length(d);
                l = d / max(dist, 1e-4);
                float range = u_light_color[i].a;
                if (range > 0.0) atten = pow(clamp(1.0 - dist / range, 0.0, 1.0), 2.0);
            }
            float ndl = max(dot(n, l), 0.0);
            diffuse += u_light_color[i].rgb * ndl * atten;
            if (ndl > 0.0) {
                vec3 h = normalize(l + view);
                specular += u_light_color[i].rgb * pow(max(dot(n, h), 0.0), u_shininess) * atten;
            }
        }
        rgb = u_color.rgb * (u_ambient + diffuse) + specular * 0.07;
    }
    out_color = vec4(rgb * u_color.a, u_color.a);
}
"#;

struct Uniforms {
    view_projection: Option<WebGlUniformLocation>,
    model: Option<WebGlUniformLocation>,
    point_size: Option<WebGlUniformLocation>,
    point_scale: Option<WebGlUniformLocation>,
    color: Option<WebGlUniformLocation>,
    lit: Option<WebGlUniformLocation>,
    shininess: Option<WebGlUniformLocation>,
    ambient: Option<WebGlUniformLocation>,
    eye: Option<WebGlUniformLocation>,
    light_count: Option<WebGlUniformLocation>,
    light_pos: Option<WebGlUniformLocation>,
    light_color: Option<WebGlUniformLocation>,
}

impl Uniforms {
    fn locate(gl: &GL, p: &WebGlProgram) -> Self {
        let at = |name: &str| gl.get_uniform_location(p, name);
        Self {
            view_projection: at("u_view_projection"),
            model: at("u_model"),
            point_size: at("u_point_size"),
            point_scale: at("u_point_scale"),
            color: at("u_color"),
            lit: at("u_lit"),
            shininess: at("u_shininess"),
            ambient: at("u_ambient"),
            eye: at("u_eye"),
            light_count: at("u_light_count"),
            light_pos: at("u_light_pos"),
            light_color: at("u_light_color"),
        }
    }
}

/// Uploaded copy of one scene geometry.
struct GpuMesh {
    vao: WebGlVertexArrayObject,
    vertex_count: i32,
    triangles: Option<(WebGlBuffer, i32)>,
    edges: Option<(WebGlBuffer, i32)>,
}

/// WebGL2 backend drawing into a canvas with a transparent clear.
pub struct WebGlRenderer {
    canvas: HtmlCanvasElement,
    gl: GL,
    program: WebGlProgram,
    uniforms: Uniforms,
    meshes: HashMap<GeometryId, GpuMesh>,
    width: u32,
    height: u32,
}

impl WebGlRenderer {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self> {
        let gl: GL = canvas
            .get_context("webgl2")?
            .ok_or(FxError::NoWebGl2)?
            .dyn_into()
            .map_err(|_| FxError::NoWebGl2)?;

        let vs = compile(&gl, GL::VERTEX_SHADER, VERTEX_SRC)?;
        let fs = compile(&gl, GL::FRAGMENT_SHADER, FRAGMENT_SRC)?;
        let program = link(&gl, &vs, &fs)?;
        let uniforms = Uniforms::locate(&gl, &program);

        Ok(Self {
            width: canvas.width(),
            height: canvas.height(),
            canvas,
            gl,
            program,
            uniforms,
            meshes: HashMap::new(),
        })
    }

    fn upload(&mut self, scene: &Scene, id: GeometryId) -> Result<()> {
        if self.meshes.contains_key(&id) {
            return Ok(());
        }
        let gl = &self.gl;
        let geometry = scene.geometry(id);
        let vao = gl.create_vertex_array().ok_or(FxError::Buffer)?;
        gl.bind_vertex_array(Some(&vao));

        let flat: Vec<f32> = geometry.positions.iter().flatten().copied().collect();
        let positions = gl.create_buffer().ok_or(FxError::Buffer)?;
        gl.bind_buffer(GL::ARRAY_BUFFER, Some(&positions));
        gl.buffer_data_with_array_buffer_view(GL::ARRAY_BUFFER, &Float32Array::from(&flat[..]), GL::STATIC_DRAW);
        gl.enable_vertex_attrib_array(0);
        gl.vertex_attrib_pointer_with_i32(0, 3, GL::FLOAT, false, 0, 0);
        gl.bind_vertex_array(None);

        let index_buffer = |indices: &[u32]| -> Result<Option<(WebGlBuffer, i32)>> {
            if indices.is_empty() {
                return Ok(None);
            }
            let buf = gl.create_buffer().ok_or(FxError::Buffer)?;
            gl.bind_buffer(GL::ELEMENT_ARRAY_BUFFER, Some(&buf));
            gl.buffer_data_with_array_buffer_view(GL::ELEMENT_ARRAY_BUFFER, &Uint32Array::from(indices), GL::STATIC_DRAW);
            Ok(Some((buf, indices.len() as i32)))
        };
        let triangles = index_buffer(&geometry.indices)?;
        let edges = index_buffer(&geometry.edges)?;

        self.meshes.insert(
            id,
            GpuMesh {
                vao,
                vertex_count: geometry.vertex_count() as i32,
                triangles,
                edges,
            },
        );
        Ok(())
    }

    fn bind_frame(&self, frame: &Frame) {
        let (gl, u) = (&self.gl, &self.uniforms);
        gl.uniform_matrix4fv_with_f32_array(u.view_projection.as_ref(), false, &frame.view_projection.to_cols_array());
        gl.uniform1f(u.point_scale.as_ref(), self.height as f32 / 2.0);
        gl.uniform3fv_with_f32_array(u.ambient.as_ref(), &frame.ambient.to_array());
        gl.uniform3fv_with_f32_array(u.eye.as_ref(), &frame.camera_position.to_array());

        let mut pos = [0.0f32; MAX_LIGHTS * 4];
        let mut col = [0.0f32; MAX_LIGHTS * 4];
        let lights = &frame.lights[..frame.lights.len().min(MAX_LIGHTS)];
        for (i, light) in lights.iter().enumerate() {
            let (p, c) = match *light {
                FrameLight::Directional { direction, color } => (direction.extend(0.0), color.extend(0.0)),
                FrameLight::Point { position, color, distance } => (position.extend(1.0), color.extend(distance)),
            };
            pos[i * 4..i * 4 + 4].copy_from_slice(&p.to_array());
            col[i * 4..i * 4 + 4].copy_from_slice(&c.to_array());
        }
        gl.uniform1i(u.light_count.as_ref(), lights.len() as i32);
        gl.uniform4fv_with_f32_array(u.light_pos.as_ref(), &pos);
        gl.uniform4fv_with_f32_array(u.light_color.as_ref(), &col);
    }

    fn draw(&self, scene: &Scene, item: &DrawItem) {
        let Some(mesh) = self.meshes.get(&item.geometry) else {
            return;
        };
        let (gl, u) = (&self.gl, &self.uniforms);
        let material = &scene[item.material];

        match material.side {
            Side::Front => gl.enable(GL::CULL_FACE),
            Side::Double => gl.disable(GL::CULL_FACE),
        }
        let c = material.color;
        gl.uniform4f(u.color.as_ref(), c.r, c.g, c.b, material.opacity.clamp(0.0, 1.0));
        gl.uniform_matrix4fv_with_f32_array(u.model.as_ref(), false, &item.world.to_cols_array());
        let lit = material.is_lit() && item.mode == DrawMode::Triangles;
        gl.uniform1i(u.lit.as_ref(), lit as i32);
        if let Shading::Phong { shininess } = material.shading {
            gl.uniform1f(u.shininess.as_ref(), shininess.max(1.0));
        }
        if let Shading::Points { size } = material.shading {
            gl.uniform1f(u.point_size.as_ref(), size);
        }

        gl.bind_vertex_array(Some(&mesh.vao));
        match item.mode {
            DrawMode::Triangles => {
                if let Some((buf, count)) = &mesh.triangles {
                    gl.bind_buffer(GL::ELEMENT_ARRAY_BUFFER, Some(buf));
                    gl.draw_elements_with_i32(GL::TRIANGLES, *count, GL::UNSIGNED_INT, 0);
                }
            }
            DrawMode::Wireframe | DrawMode::Lines => {
                if let Some((buf, count)) = &mesh.edges {
                    gl.bind_buffer(GL::ELEMENT_ARRAY_BUFFER, Some(buf));
                    gl.draw_elements_with_i32(GL::LINES, *count, GL::UNSIGNED_INT, 0);
                }
            }
            DrawMode::Points => gl.draw_arrays(GL::POINTS, 0, mesh.vertex_count),
        }
        gl.bind_vertex_array(None);
    }
}

impl Renderer for WebGlRenderer {
    fn set_size(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        self.width = width;
        self.height = height;
    }

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear_alpha(&self) -> f32 {
        0.0
    }

    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) {
        let frame = Frame::build(scene, camera);
        for item in frame.items() {
            if let Err(e) = self.upload(scene, item.geometry) {
                log::warn!("skipping geometry {:?}: {e}", item.geometry);
            }
        }

        let gl = &self.gl;
        gl.viewport(0, 0, self.width as i32, self.height as i32);
        gl.clear_color(0.0, 0.0, 0.0, self.clear_alpha());
        gl.clear(GL::COLOR_BUFFER_BIT | GL::DEPTH_BUFFER_BIT);
        gl.enable(GL::DEPTH_TEST);
        gl.enable(GL::BLEND);
        // Shader output is premultiplied.
        gl.blend_func(GL::ONE, GL::ONE_MINUS_SRC_ALPHA);
        gl.use_program(Some(&self.program));
        self.bind_frame(&frame);

        gl.depth_mask(true);
        for item in &frame.opaque {
            self.draw(scene, item);
        }
        gl.depth_mask(false);
        for item in &frame.blended {
            self.draw(scene, item);
        }
        gl.depth_mask(true);
    }
}

fn compile(gl: &GL, kind: u32, src: &str) -> Result<WebGlShader> {
    let shader = gl
        .create_shader(kind)
        .ok_or_else(|| FxError::Shader("create_shader failed".into()))?;
    gl.shader_source(&shader, src);
    gl.compile_shader(&shader);
    if gl
        .get_shader_parameter(&shader, GL::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(shader)
    } else {
        Err(FxError::Shader(gl.get_shader_info_log(&shader).unwrap_or_default()))
    }
}

fn link(gl: &GL, vs: &WebGlShader, fs: &WebGlShader) -> Result<WebGlProgram> {
    let program = gl
        .create_program()
        .ok_or_else(|| FxError::Shader("create_program failed".into()))?;
    gl.attach_shader(&program, vs);
    gl.attach_shader(&program, fs);
    gl.link_program(&program);
    if gl
        .get_program_parameter(&program, GL::LINK_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(program)
    } else {
        Err(FxError::Shader(gl.get_program_info_log(&program).unwrap_or_default()))
    }
}
