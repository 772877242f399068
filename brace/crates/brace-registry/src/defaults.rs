use crate::spec::FunctionSpec;
use crate::{datefn, numeric, stringfn, surveyfn};

pub fn default_table() -> Vec<FunctionSpec> {
    let mut all = Vec::new();
    all.extend(numeric::table());
    all.extend(stringfn::table());
    all.extend(datefn::table());
    all.extend(surveyfn::table());
    all
}
