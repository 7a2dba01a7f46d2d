use wasm_bindgen::prelude::*;

mod mechanism;

use mechanism::CarbonylReduction;

mechanim_web::export_mechanism!(CarbonylReduction, "carbonyl-reduction", vectors);
