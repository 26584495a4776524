pub mod regalloc;
