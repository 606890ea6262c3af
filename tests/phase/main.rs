mod machine;
mod timer;
