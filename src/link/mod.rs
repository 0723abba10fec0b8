//! Linking summary items to body slices and assembling docs.

mod assembler;
mod linker;

pub use assembler::{
    make_doc_id, DocAssembler, FLAG_BODY_EMPTY, FLAG_ID_DUPLICATE, FLAG_TIPO_UNKNOWN,
};
pub use linker::{check_conservation, Linkage, Linker};
