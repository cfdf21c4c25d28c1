//! Frame loop integration tests
//!
//! Drives input, logic and rendering together against the recording device.

use std::cell::RefCell;
use std::rc::Rc;

use ash::vk;
use ash::vk::Handle;

use crate::config::RendererConfig;
use crate::foundation::math::Vec2;
use crate::input::{GamepadAxes, InputSnapshot};
use crate::logic::{LogicManager, LogicRegistry, Node2dMove, TickParams};
use crate::render::testing::{MemoryLoader, MockDevice};
use crate::render::vulkan::is_null_handle;
use crate::render::{BuiltinPipeline, EmptyTree, RenderManager, SharedVisualTree};
use crate::scene::{Group, Quad2d, SceneGraph2d};
use approx::assert_relative_eq;

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    fn ready_manager() -> (Rc<MockDevice>, RenderManager) {
        let mock = Rc::new(MockDevice::new());
        let mut manager = RenderManager::new(
            &RendererConfig::default(),
            Box::new(MemoryLoader::with_default_shaders()),
        );
        manager.set_device(mock.clone());
        manager.set_swapchain_format(vk::Format::B8G8R8A8_SRGB);
        manager.set_swapchain_extent(vk::Extent2D { width: 1280, height: 720 });
        manager.set_command_pool(vk::CommandPool::from_raw(0xAB));
        manager.create_renderpasses().unwrap();
        manager.create_pipelines().unwrap();
        (mock, manager)
    }

    #[test]
    fn test_ship_moves_across_frames() {
        let (mock, mut manager) = ready_manager();
        assert!(!is_null_handle(manager.pipeline(BuiltinPipeline::Pos2dRgbColor)));

        let scene = Rc::new(RefCell::new(SceneGraph2d::new()));
        let ship = {
            let mut graph = scene.borrow_mut();
            graph.init(manager.device().unwrap()).unwrap();
            let root = graph.create_node("root", Group);
            let ship = graph.create_node("ship", Quad2d::default());
            graph.set_scale(ship, Vec2::new(64.0, 64.0)).unwrap();
            graph.manage_child(root, ship).unwrap();
            graph.switch_root_node(Some(root)).unwrap();
            ship
        };
        let previous = manager.switch_vtree(scene.clone());
        assert!(previous.try_borrow_mut().is_ok());

        let registry = LogicRegistry::with_builtins();
        let mut logic = LogicManager::new();
        let config: toml::Value = toml::from_str("speed = 100.0").unwrap();
        logic
            .spawn(&registry, Node2dMove::NAME, &scene.borrow(), ship, Some(&config))
            .unwrap();

        let mut input = InputSnapshot::new();
        input.set_gamepad(0, GamepadAxes::new(1.0, 0.5));
        mock.clear_calls();

        for frame in 0..3u64 {
            manager.clear_commands();
            logic.tick(
                &TickParams { elapsed: 0.1, input: &input },
                &mut scene.borrow_mut(),
            );
            manager
                .render_frame(vk::Framebuffer::from_raw(0x100 + frame))
                .unwrap();
            assert_eq!(manager.commands().len(), 1);
        }

        let pushed = mock.pushed_transforms();
        assert_eq!(pushed.len(), 3);
        for (i, constants) in pushed.iter().enumerate() {
            let step = (i + 1) as f32 * 10.0;
            assert_relative_eq!(constants.position[0], step, epsilon = EPSILON);
            assert_relative_eq!(constants.position[1], step * 0.5, epsilon = EPSILON);
            assert_relative_eq!(constants.scale[0], 64.0, epsilon = EPSILON);
            assert_relative_eq!(constants.viewport[1], 720.0, epsilon = EPSILON);
        }
    }

    #[test]
    fn test_resize_keeps_rendering() {
        let (mock, mut manager) = ready_manager();
        let scene = Rc::new(RefCell::new(SceneGraph2d::new()));
        {
            let mut graph = scene.borrow_mut();
            graph.init(manager.device().unwrap()).unwrap();
            let quad = graph.create_node("quad", Quad2d::default());
            graph.switch_root_node(Some(quad)).unwrap();
        }
        manager.switch_vtree(scene.clone());

        manager
            .recreate_pipelines(vk::Extent2D { width: 640, height: 360 })
            .unwrap();
        manager.render_frame(vk::Framebuffer::from_raw(0x200)).unwrap();

        let last = *mock.pushed_transforms().last().unwrap();
        assert_relative_eq!(last.viewport[0], 640.0, epsilon = EPSILON);
        assert_relative_eq!(last.viewport[1], 360.0, epsilon = EPSILON);
    }

    #[test]
    fn test_teardown_releases_everything() {
        let (mock, mut manager) = ready_manager();
        let scene = Rc::new(RefCell::new(SceneGraph2d::new()));
        scene.borrow_mut().init(manager.device().unwrap()).unwrap();
        manager.switch_vtree(scene.clone());
        manager.render_frame(vk::Framebuffer::from_raw(0x300)).unwrap();

        let empty: SharedVisualTree = Rc::new(RefCell::new(EmptyTree));
        let returned = manager.switch_vtree(empty);
        assert!(Rc::ptr_eq(&returned, &(scene.clone() as SharedVisualTree)));

        scene.borrow_mut().uninit();
        manager.clear_commands();
        manager.destroy_pipelines();
        manager.destroy_renderpasses();
        manager.destroy_pipelines();

        assert_eq!(mock.live_count(), 0);
    }

    #[test]
    fn test_long_run_and_failed_frame_keep_handles_flat() {
        let (mock, mut manager) = ready_manager();
        let scene = Rc::new(RefCell::new(SceneGraph2d::new()));
        {
            let mut graph = scene.borrow_mut();
            graph.init(manager.device().unwrap()).unwrap();
            let quad = graph.create_node("quad", Quad2d::default());
            graph.switch_root_node(Some(quad)).unwrap();
        }
        manager.switch_vtree(scene.clone());
        let baseline = mock.live_count();

        for frame in 0..100u64 {
            manager.clear_commands();
            manager
                .render_frame(vk::Framebuffer::from_raw(0x400 + frame))
                .unwrap();
        }
        manager.clear_commands();
        assert_eq!(mock.live_count(), baseline);

        manager.destroy_pipelines();
        let without_pipelines = mock.live_count();
        assert!(manager.render_frame(vk::Framebuffer::from_raw(0x500)).is_err());
        assert!(manager.commands().is_empty());
        assert_eq!(mock.live_count(), without_pipelines);

        manager.create_pipelines().unwrap();
        manager.render_frame(vk::Framebuffer::from_raw(0x501)).unwrap();
        assert_eq!(manager.commands().len(), 1);
    }
}
