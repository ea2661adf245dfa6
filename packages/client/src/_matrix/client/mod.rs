pub mod r0;
