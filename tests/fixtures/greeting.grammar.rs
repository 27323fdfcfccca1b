// Greeting parser used by the generated-parser tests.

use pegc::runtime::Node;

/*!* Greeting
Greeting: 'hello' [ name:/\w+/ ] :Mark?
Mark: '!'
    fn __finalise(res: &mut Node) {
        res.text.push('!');
    }
*/
