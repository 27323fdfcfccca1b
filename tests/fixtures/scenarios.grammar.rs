// Matcher scenarios used by the generated-parser tests.

use pegc::runtime::{Node, Value};

/*!* Scenarios
Item: 'a' | 'b'
Repeated: item:Item+
NoMatch: 'x' !'y'
Greedy: 'a'* 'a'
Choice: 'ab' | 'a' | 'c'
Word: /[a-z]+/
Num: /[0-9]+/
Open: '<' kind:/\w+/ '>' $kind '</$kind>'
Base: :Word .',' :Num?
    fn *(res: &mut Node, sub: Node) {
        res.fields.insert(sub.name.clone(), Value::Str(sub.text.to_uppercase()));
    }
Child extends Base
Silent: .(t:'a' 'b') 'c'
T: '$k'
R1(k=b): 'a' T 'c'
R2(k=a): 'a' T
S: R1 | R2
*/
