use mechanim::ManifestMechanism;
use wasm_bindgen::prelude::*;

const SN2_MANIFEST: &str = include_str!("../assets/sn2.json");

fn load() -> Result<ManifestMechanism, mechanim::ManifestError> {
    ManifestMechanism::from_json(SN2_MANIFEST)
}

mechanim_web::export_mechanism!(ManifestMechanism, "sn2-substitution", load(), vectors);
