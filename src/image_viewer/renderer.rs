use super::renderable::Renderable;
use glium::draw_parameters::{Blend, DrawParameters};
use glium::glutin::event_loop::EventLoop;
use glium::glutin::window::{Fullscreen, WindowBuilder};
use glium::index::PrimitiveType;
use glium::texture::Texture2d;
use glium::uniforms::{EmptyUniforms, UniformsStorage};
use glium::{Display, Frame, IndexBuffer, Program, Surface, VertexBuffer};

use crate::error::Result;

#[derive(Copy, Clone)]
struct Vertex {
    position: [f32; 2],
    texture_pos: [f32; 2],
}

implement_vertex!(Vertex, position, texture_pos);

// Constants to define the vertices of the square
const VERTICES: [Vertex; 4] = [
    Vertex {
        position: [-1.0, 1.0],
        texture_pos: [0.0, 1.0],
    },
    Vertex {
        position: [-1.0, -1.0],
        texture_pos: [0.0, 0.0],
    },
    Vertex {
        position: [1.0, 1.0],
        texture_pos: [1.0, 1.0],
    },
    Vertex {
        position: [1.0, -1.0],
        texture_pos: [1.0, 0.0],
    },
];

const INDICES: [u16; 6] = [0, 2, 1, 1, 3, 2];

pub struct Renderer {
    display: Display,
    program: Program,
    vb: VertexBuffer<Vertex>,
    ib: IndexBuffer<u16>,
}

impl Renderer {
    pub fn new(title: &str) -> Result<(Self, EventLoop<()>)> {
        let (display, events_loop) = create_display(title)?;
        let program = link_shader(&display)?;
        let (vb, ib) = create_buffers(&display)?;

        let renderer = Renderer {
            display,
            program,
            vb,
            ib,
        };

        Ok((renderer, events_loop))
    }

    pub fn request_redraw(&self) {
        self.display.gl_window().window().request_redraw();
    }

    pub fn hide(&self) {
        self.display.gl_window().window().set_visible(false);
    }

    // The returned frame must be handed back to finish_frame, glium panics if it is dropped
    pub fn new_frame(&self) -> Frame {
        let mut target = self.display.draw();
        target.clear_color(0.0, 0.0, 0.0, 1.0);
        target
    }

    pub fn draw(&self, target: &mut Frame, item: &mut Renderable) -> Result<()> {
        let params = DrawParameters {
            blend: Blend::alpha_blending(),
            ..Default::default()
        };

        // Sized from the frame itself so a late fullscreen switch is picked up
        let matrix = item.matrix(target.get_dimensions());
        target.draw(
            &self.vb,
            &self.ib,
            &self.program,
            &uniforms(item.get_texture(&self.display)?, matrix),
            &params,
        )?;

        Ok(())
    }

    pub fn finish_frame(&self, target: Frame) -> Result<()> {
        target.finish()?;
        Ok(())
    }
}

// Just a wrapper to be more readable at the draw call. This type signature is horrible...
fn uniforms(
    tex: &Texture2d,
    matrix: [[f32; 4]; 4],
) -> UniformsStorage<[[f32; 4]; 4], UniformsStorage<&Texture2d, EmptyUniforms>> {
    uniform! {
        tex: tex,
        matrix: matrix
    }
}

// Open a borderless fullscreen window on the current monitor with the cursor hidden, and return
// the display and the associated events loop
fn create_display(title: &str) -> Result<(glium::Display, EventLoop<()>)> {
    let events_loop = EventLoop::new();

    let window = WindowBuilder::new()
        .with_fullscreen(Some(Fullscreen::Borderless(None)))
        .with_decorations(false)
        .with_title(title);

    let context = glium::glutin::ContextBuilder::new().with_vsync(true);

    let display = glium::Display::new(window, context, &events_loop)?;
    display.gl_window().window().set_cursor_visible(false);

    Ok((display, events_loop))
}

fn link_shader(display: &Display) -> Result<Program> {
    const VERT_SHADER: &str = include_str!("../../res/shader.vert");
    const FRAG_SHADER: &str = include_str!("../../res/shader.frag");
    Ok(Program::from_source(display, VERT_SHADER, FRAG_SHADER, None)?)
}

fn create_buffers(display: &Display) -> Result<(VertexBuffer<Vertex>, IndexBuffer<u16>)> {
    let vb = VertexBuffer::new(display, &VERTICES)?;
    let ib = IndexBuffer::new(display, PrimitiveType::TrianglesList, &INDICES)?;

    Ok((vb, ib))
}
