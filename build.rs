fn main() {
    // sqlx::migrate! embeds the directory contents at compile time
    println!("cargo:rerun-if-changed=migrations");
}
