#![cfg(target_arch = "wasm32")]
use js_sys::{Array, Function, Object, Reflect};
use vizij_spatial_wasm::{abi_version, VizijSpatial};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn get(obj: &JsValue, key: &str) -> JsValue {
    Reflect::get(obj, &JsValue::from_str(key)).unwrap()
}

fn source_x(outputs: &JsValue, id: u32) -> Option<f64> {
    let changes = Array::from(&get(outputs, "changes"));
    for i in 0..changes.length() {
        let ch = changes.get(i);
        let target = get(&ch, "target");
        if get(&target, "kind").as_string().as_deref() == Some("source")
            && get(&target, "id").as_f64() == Some(id as f64)
        {
            let p = Array::from(&get(&get(&ch, "pose"), "p"));
            return p.get(0).as_f64();
        }
    }
    None
}

#[wasm_bindgen_test]
fn abi_is_1() {
    assert_eq!(abi_version(), 1);
}

#[wasm_bindgen_test]
fn construct_with_defaults_and_rejects_zero_capacity() {
    assert!(VizijSpatial::new(JsValue::UNDEFINED).is_ok());

    let cfg = Object::new();
    Reflect::set(&cfg, &"resource_capacity".into(), &JsValue::from(0)).unwrap();
    assert!(VizijSpatial::new(cfg.into()).is_err());
}

#[wasm_bindgen_test]
fn source_moves_over_transition_time() {
    let cfg = Object::new();
    Reflect::set(&cfg, &"transition_time".into(), &JsValue::from(1.0)).unwrap();
    let mut scene = VizijSpatial::new(cfg.into()).unwrap();

    let id = scene.add_source();
    scene.update(0.0).unwrap();
    scene.set_source_position(id, 10.0, 0.0, 0.0, 0.0).unwrap();

    let out = scene.update(0.5).unwrap();
    assert_eq!(source_x(&out, id), Some(5.0));
    assert!(scene.set_source_position(99, 0.0, 0.0, 0.0, 0.0).is_err());
}

#[wasm_bindgen_test]
fn js_spatializer_receives_poses_and_is_disposed() {
    let mut scene = VizijSpatial::new(JsValue::NULL).unwrap();
    let id = scene.add_source();

    let update = Function::new_with_args("pose", "globalThis.__poses = (globalThis.__poses || 0) + 1;");
    let dispose = Function::new_no_args("globalThis.__disposed = (globalThis.__disposed || 0) + 1;");
    scene
        .set_source_spatializer(id, update, Some(dispose))
        .unwrap();

    scene.update(0.0).unwrap();
    scene.update(0.1).unwrap();
    assert!(scene.remove_source(id));

    let global = js_sys::global();
    assert_eq!(get(&global, "__poses").as_f64(), Some(2.0));
    assert_eq!(get(&global, "__disposed").as_f64(), Some(1.0));
}

#[wasm_bindgen_test]
fn resource_cache_is_bounded() {
    let cfg = Object::new();
    Reflect::set(&cfg, &"resource_capacity".into(), &JsValue::from(2)).unwrap();
    let mut scene = VizijSpatial::new(cfg.into()).unwrap();

    scene.cache_resource("a".into(), "clip".into(), 10);
    scene.cache_resource("b".into(), "clip".into(), 10);
    scene.cache_resource("c".into(), "clip".into(), 10);
    assert_eq!(scene.resource_count(), 2);
    assert!(!scene.has_resource("a"));

    let out = scene.update(0.0).unwrap();
    let events = Array::from(&get(&out, "events"));
    assert_eq!(events.length(), 1);
    let evicted = get(&events.get(0), "ResourceEvicted");
    assert_eq!(get(&evicted, "key").as_string().as_deref(), Some("a"));

    assert!(scene.delete_resource("b"));
    scene.shutdown();
    assert_eq!(scene.resource_count(), 0);
}
