//! Tests for command chain linking and submission.

use std::cell::RefCell;
use std::rc::Rc;

use vdp_geom_core::math::{FixVec3, Mat43, MatrixStack};
use vdp_geom_core::platform::{NoInterrupts, SoftDivider};
use vdp_geom_core::render::command::{DrawCommand, LinkType};
use vdp_geom_core::render::light::{Lighting, NoLighting};
use vdp_geom_core::render::mesh::{Attribute, Mesh, Polygon};
use vdp_geom_core::render::sort::{BucketSort, DepthSort};
use vdp_geom_core::render::texture::TextureList;
use vdp_geom_core::{DisplaySubmit, EmitOutcome, PassStats, RenderContext, RenderError};

#[derive(Debug, Clone, PartialEq)]
struct Submission {
    commands: Vec<DrawCommand>,
    pool_base: u16,
    entry: u16,
}

/// Display that keeps a copy of every submission, shared with the test.
#[derive(Clone, Default)]
struct RecordingDisplay {
    submissions: Rc<RefCell<Vec<Submission>>>,
}

impl DisplaySubmit for RecordingDisplay {
    fn submit(&mut self, commands: &[DrawCommand], pool_base: u16, entry: u16) {
        self.submissions.borrow_mut().push(Submission {
            commands: commands.to_vec(),
            pool_base,
            entry,
        });
    }
}

#[derive(Default)]
struct FrameEndCounter {
    frame_ends: u32,
}

impl Lighting for FrameEndCounter {
    fn frame_end(&mut self) {
        self.frame_ends += 1;
    }
}

type Context = RenderContext<SoftDivider, NoInterrupts>;

/// Render one front-facing square per entry of `depths`, all on screen.
fn render_squares(ctx: &mut Context, depths: &[i16]) {
    let stats = try_render_squares(ctx, depths).unwrap();
    assert_eq!(stats.emitted as usize, depths.len());
}

fn try_render_squares<S: DepthSort>(
    ctx: &mut RenderContext<SoftDivider, NoInterrupts, S>,
    depths: &[i16],
) -> Result<PassStats, RenderError> {
    let mut points = Vec::new();
    let mut polygons = Vec::new();
    for (i, &z) in depths.iter().enumerate() {
        let base = points.len() as u16;
        let x = (i as i16 % 8) * 4 - 16;
        points.extend([
            FixVec3::from_int(x - 1, -1, z),
            FixVec3::from_int(x - 1, 1, z),
            FixVec3::from_int(x + 1, 1, z),
            FixVec3::from_int(x + 1, -1, z),
        ]);
        polygons.push(Polygon::new(base, base + 1, base + 2, base + 3));
    }
    let attributes = vec![Attribute::flat(0x7FFF); polygons.len()];
    let mesh = Mesh::new(&points, &polygons, &attributes).unwrap();

    ctx.render_mesh(
        &mesh,
        &MatrixStack::new(),
        &Mat43::IDENTITY,
        &mut NoLighting,
        &TextureList::new(),
    )
}

/// Sort that accepts every insert and forgets it.
struct ForgetfulSort;

impl DepthSort for ForgetfulSort {
    fn reset(&mut self) {}

    fn insert(&mut self, _link: u16, _depth: i32) -> Result<(), RenderError> {
        Ok(())
    }

    fn iterate_ascending(&self, _visitor: &mut dyn FnMut(u16)) {}
}

/// Follow the chain from the call site, returning pool indices in draw
/// order.
fn walk_chain(call_site: &DrawCommand, commands: &[DrawCommand], pool_base: u16) -> Vec<u16> {
    let mut order = Vec::new();
    let mut slot = call_site.link;
    loop {
        let index = slot.wrapping_sub(pool_base);
        order.push(index);
        let cmd = &commands[index as usize];
        if cmd.link_type == LinkType::JumpReturn {
            break;
        }
        assert_eq!(cmd.link_type, LinkType::JumpAssign);
        assert!(order.len() <= commands.len(), "chain loops");
        slot = cmd.link;
    }
    order
}

mod empty_frame {
    use super::*;

    #[test]
    fn nothing_visible_skips_without_submitting() {
        let mut ctx = Context::new(SoftDivider::new(), NoInterrupts);
        let mut display = RecordingDisplay::default();
        let mut lighting = FrameEndCounter::default();
        let mut call_site = DrawCommand {
            link_type: LinkType::JumpCall,
            link: 99,
            ..Default::default()
        };

        let outcome = ctx.emit(&mut call_site, 16, &mut display, &mut lighting);

        assert_eq!(outcome, EmitOutcome::Skipped);
        assert_eq!(call_site.link_type, LinkType::JumpNext);
        assert!(display.submissions.borrow().is_empty());
        assert_eq!(lighting.frame_ends, 0);
    }

    #[test]
    fn fully_culled_frame_is_skipped() {
        let mut ctx = Context::new(SoftDivider::new(), NoInterrupts);
        let points = [
            FixVec3::from_int(-1, -1, 100),
            FixVec3::from_int(1, -1, 100),
            FixVec3::from_int(1, 1, 100),
            FixVec3::from_int(-1, 1, 100),
        ];
        let polygons = [Polygon::new(0, 1, 2, 3)];
        let attributes = [Attribute::flat(0)];
        let mesh = Mesh::new(&points, &polygons, &attributes).unwrap();
        ctx.render_mesh(
            &mesh,
            &MatrixStack::new(),
            &Mat43::IDENTITY,
            &mut NoLighting,
            &TextureList::new(),
        )
        .unwrap();

        let mut display = RecordingDisplay::default();
        let mut call_site = DrawCommand::default();
        let outcome = ctx.emit(&mut call_site, 0, &mut display, &mut NoLighting);

        assert_eq!(outcome, EmitOutcome::Skipped);
        assert!(display.submissions.borrow().is_empty());
    }
}

mod chain {
    use super::*;

    #[test]
    fn single_record_is_called_and_returns() {
        let mut ctx = Context::new(SoftDivider::new(), NoInterrupts);
        render_squares(&mut ctx, &[100]);
        let mut display = RecordingDisplay::default();
        let mut lighting = FrameEndCounter::default();
        let mut call_site = DrawCommand::default();

        let outcome = ctx.emit(&mut call_site, 8, &mut display, &mut lighting);

        assert_eq!(outcome, EmitOutcome::Submitted { count: 1 });
        assert_eq!(call_site.link_type, LinkType::JumpCall);
        assert_eq!(call_site.link, 8);
        assert_eq!(ctx.commands()[0].link_type, LinkType::JumpReturn);
        assert_eq!(lighting.frame_ends, 1);

        let submissions = display.submissions.borrow();
        assert_eq!(submissions.len(), 1);
        assert_eq!(submissions[0].pool_base, 8);
        assert_eq!(submissions[0].entry, 0);
        assert_eq!(submissions[0].commands, ctx.commands());
    }

    #[test]
    fn records_are_chained_in_ascending_bucket_order() {
        let mut ctx = Context::new(SoftDivider::new(), NoInterrupts);
        // Buckets 49, 149, 99, 74 at the default far plane.
        render_squares(&mut ctx, &[100, 300, 200, 150]);
        let mut display = RecordingDisplay::default();
        let mut call_site = DrawCommand::default();

        ctx.emit(&mut call_site, 32, &mut display, &mut NoLighting);

        assert_eq!(walk_chain(&call_site, ctx.commands(), 32), vec![0, 3, 2, 1]);
        assert_eq!(display.submissions.borrow()[0].entry, 0);
    }

    #[test]
    fn equal_depths_keep_submission_order() {
        let mut ctx = Context::new(SoftDivider::new(), NoInterrupts);
        render_squares(&mut ctx, &[200, 100, 200, 100, 200]);
        let mut display = RecordingDisplay::default();
        let mut call_site = DrawCommand::default();

        ctx.emit(&mut call_site, 0, &mut display, &mut NoLighting);

        assert_eq!(walk_chain(&call_site, ctx.commands(), 0), vec![1, 3, 0, 2, 4]);
        assert_eq!(display.submissions.borrow()[0].entry, 1);
    }

    #[test]
    fn every_record_is_linked_exactly_once() {
        let mut ctx = Context::new(SoftDivider::new(), NoInterrupts);
        let depths: Vec<i16> = (0..40).map(|i| 50 + (i * 37) % 900).collect();
        render_squares(&mut ctx, &depths);
        let mut display = RecordingDisplay::default();
        let mut call_site = DrawCommand::default();

        let outcome = ctx.emit(&mut call_site, 100, &mut display, &mut NoLighting);

        assert_eq!(outcome, EmitOutcome::Submitted { count: 40 });
        let mut order = walk_chain(&call_site, ctx.commands(), 100);
        let chained_depths: Vec<i16> = order.iter().map(|&i| depths[i as usize]).collect();
        assert!(chained_depths.windows(2).all(|w| w[0] <= w[1]));
        order.sort_unstable();
        assert_eq!(order, (0..40).collect::<Vec<u16>>());
        let returns = ctx
            .commands()
            .iter()
            .filter(|cmd| cmd.link_type == LinkType::JumpReturn)
            .count();
        assert_eq!(returns, 1);
    }

    #[test]
    fn encoded_link_words_address_slots_in_eight_byte_units() {
        let mut ctx = Context::new(SoftDivider::new(), NoInterrupts);
        render_squares(&mut ctx, &[100, 200]);
        let mut display = RecordingDisplay::default();
        let mut call_site = DrawCommand::default();

        ctx.emit(&mut call_site, 10, &mut display, &mut NoLighting);

        let first = ctx.commands()[0].encode();
        assert_eq!(first[1], 11 * 4);
        assert_eq!(first[0] >> 12, LinkType::JumpAssign as u16);
        let last = ctx.commands()[1].encode();
        assert_eq!(last[0] >> 12, LinkType::JumpReturn as u16);
        assert_eq!(call_site.encode()[0] >> 12, LinkType::JumpCall as u16);
        assert_eq!(call_site.encode()[1], 10 * 4);
    }

    #[test]
    fn next_frame_starts_clean() {
        let mut ctx = Context::new(SoftDivider::new(), NoInterrupts);
        render_squares(&mut ctx, &[100, 200]);
        let mut display = RecordingDisplay::default();
        let mut call_site = DrawCommand::default();
        ctx.emit(&mut call_site, 0, &mut display, &mut NoLighting);

        ctx.frame_start();
        render_squares(&mut ctx, &[300]);
        ctx.emit(&mut call_site, 0, &mut display, &mut NoLighting);

        let submissions = display.submissions.borrow();
        assert_eq!(submissions.len(), 2);
        assert_eq!(submissions[1].commands.len(), 1);
        assert_eq!(walk_chain(&call_site, ctx.commands(), 0), vec![0]);
    }
}

mod sort_capacity {
    use super::*;

    #[test]
    fn records_past_a_full_sort_are_not_submitted() {
        let mut ctx = RenderContext::with_sort(
            SoftDivider::new(),
            NoInterrupts,
            BucketSort::<512, 1>::new(),
        );
        let result = try_render_squares(&mut ctx, &[100, 120]);
        assert_eq!(result, Err(RenderError::SortExhausted { capacity: 1 }));

        let mut display = RecordingDisplay::default();
        let mut call_site = DrawCommand::default();
        let outcome = ctx.emit(&mut call_site, 4, &mut display, &mut NoLighting);

        assert_eq!(outcome, EmitOutcome::Submitted { count: 1 });
        let submissions = display.submissions.borrow();
        assert_eq!(submissions[0].commands.len(), 1);
        assert_eq!(submissions[0].commands[0].link_type, LinkType::JumpReturn);
        assert_eq!(walk_chain(&call_site, &submissions[0].commands, 4), vec![0]);
    }

    #[test]
    fn nothing_sorted_skips_the_frame() {
        let mut ctx = RenderContext::with_sort(SoftDivider::new(), NoInterrupts, ForgetfulSort);
        try_render_squares(&mut ctx, &[100]).unwrap();

        let mut display = RecordingDisplay::default();
        let mut lighting = FrameEndCounter::default();
        let mut call_site = DrawCommand {
            link_type: LinkType::JumpCall,
            link: 99,
            ..Default::default()
        };
        let outcome = ctx.emit(&mut call_site, 4, &mut display, &mut lighting);

        assert_eq!(outcome, EmitOutcome::Skipped);
        assert_eq!(call_site.link_type, LinkType::JumpNext);
        assert!(display.submissions.borrow().is_empty());
        assert_eq!(lighting.frame_ends, 0);
    }
}
