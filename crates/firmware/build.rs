// Hello UART - bare-metal UART bring-up harness
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use std::env;
use std::path::PathBuf;

fn main() {
    let manifest_dir = PathBuf::from(env::var_os("CARGO_MANIFEST_DIR").unwrap());
    let script = manifest_dir.join("kernel.ld");
    println!("cargo:rustc-link-arg=--script={}", script.display());
    println!("cargo:rerun-if-changed=kernel.ld");
    println!("cargo:rerun-if-changed=src/boot.s");
}
